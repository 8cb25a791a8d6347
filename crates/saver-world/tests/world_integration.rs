use rayon::ThreadPoolBuilder;
use saver_core::{PopulationConfig, SaverConfig, SeedConfig, Size, Vec2};
use saver_world::{LifeGrid, Pattern, Population, Simulation};

fn live_sorted(grid: &LifeGrid) -> Vec<(usize, usize)> {
    let mut cells: Vec<_> = grid.live_cells().collect();
    cells.sort();
    cells
}

#[test]
fn glider_moves_one_cell_diagonally_every_four_ticks() {
    let mut grid = LifeGrid::new(10, 10).expect("grid");
    grid.stamp(&Pattern::GLIDER, 1, 1).expect("glider fits");
    let original = live_sorted(&grid);
    assert_eq!(original.len(), 5);

    for _ in 0..4 {
        grid.step();
    }

    let expected: Vec<_> = original.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(live_sorted(&grid), expected);
}

#[test]
fn capped_population_bounces_without_growing() {
    let config = PopulationConfig {
        boundary: Size::new(800, 600),
        footprint: Size::new(120, 30),
        ..Default::default()
    }
    .with_max_population(1)
    .expect("valid cap");
    let mut population = Population::new(&config, 11).expect("population");

    let start = *population.get(0).expect("seed entity");
    assert_eq!(start.position, Vec2::new(100.0, 100.0));
    assert_eq!(start.velocity, Vec2::new(5.0, 5.0));

    // Floor is reached at tick 94, the right wall not until tick 116
    for _ in 0..100 {
        population.advance();
        assert_eq!(population.len(), 1);
    }

    let entity = population.get(0).expect("seed entity");
    assert_eq!(entity.velocity.x, 5.0);
    assert_eq!(entity.velocity.y, -5.0);
}

fn population_sizes_with_threads(threads: usize, ticks: usize) -> Vec<usize> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("thread pool");
    let config = PopulationConfig::default()
        .with_max_population(50)
        .expect("valid cap");

    pool.install(|| {
        let mut population = Population::new(&config, 2024).expect("population");
        let mut sizes = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let before = population.len();
            population.advance();
            let after = population.len();
            assert!(after - before <= 1, "grew by {} in one tick", after - before);
            assert!(after <= 50);
            sizes.push(after);
        }
        sizes
    })
}

#[test]
fn population_growth_is_independent_of_thread_count() {
    let ticks = 3_000;
    let baseline = population_sizes_with_threads(1, ticks);
    assert_eq!(*baseline.last().expect("ticks ran"), 50);

    for threads in [2, 4, 8] {
        assert_eq!(
            population_sizes_with_threads(threads, ticks),
            baseline,
            "{threads} threads diverged from a single worker"
        );
    }
}

#[test]
fn simulation_keeps_cap_under_parallel_pool() {
    let mut config = SaverConfig {
        rng_seed: 5,
        seed: SeedConfig::new(10, 2, 10),
        log_every: 250,
        ..Default::default()
    };
    config.population.max_population = 12;

    let pool = ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("thread pool");

    let summary = pool.install(|| {
        let mut sim = Simulation::new(config).expect("simulation");
        let mut previous = sim.population().len();
        for _ in 0..1_000 {
            let report = sim.tick();
            assert!(report.population - previous <= 1);
            assert!(report.population <= 12);
            previous = report.population;
        }
        sim.run(0)
    });

    assert_eq!(summary.final_population, 12);
    assert_eq!(summary.generation, 1_000);
}
