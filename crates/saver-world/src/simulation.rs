//! Simulation engine ticking the grid and the population together.

use crate::grid::LifeGrid;
use crate::population::Population;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use saver_core::{Result, SaverConfig};
use serde::Serialize;
use tracing::{event, info, instrument, trace, Level};

/// Snapshot of one completed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub population: usize,
    pub bounces: usize,
    pub spawned: Option<usize>,
    pub live_cells: usize,
}

/// Totals over a `Simulation::run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_population: usize,
    pub spawned: u64,
    pub live_cells: usize,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Simulation {
    grid: LifeGrid,
    population: Population,
    config: SaverConfig,
    tick: u64,
}

impl Simulation {
    pub fn new(config: SaverConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let grid = LifeGrid::from_config(&config.grid, &config.seed, &mut rng)?;
        let population = Population::new(&config.population, rng.gen())?;

        info!(
            grid_width = grid.width(),
            grid_height = grid.height(),
            live_cells = grid.live_count(),
            max_population = population.max_population(),
            boundary = %population.boundary(),
            footprint = %population.footprint(),
            "Simulation initialized"
        );

        Ok(Self {
            grid,
            population,
            config,
            tick: 0,
        })
    }

    /// Advance the population, then the grid, by one tick
    pub fn tick(&mut self) -> TickReport {
        let outcome = self.population.advance();
        self.grid.step();
        self.tick += 1;

        let report = TickReport {
            tick: self.tick,
            population: self.population.len(),
            bounces: outcome.bounces,
            spawned: outcome.spawned,
            live_cells: self.grid.live_count(),
        };

        trace!(
            tick = report.tick,
            population = report.population,
            bounces = report.bounces,
            spawned = ?report.spawned,
            "Tick complete"
        );

        if self.config.log_every > 0 && self.tick % self.config.log_every == 0 {
            self.emit_population_metrics(&report);
        }

        report
    }

    /// Run the given number of ticks back to back
    #[instrument(skip(self), fields(start_tick = self.tick))]
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        info!("Running simulation for {} ticks", ticks);

        let spawned_before = self.population.total_spawned();
        for _ in 0..ticks {
            self.tick();
        }

        let summary = RunSummary {
            ticks,
            final_population: self.population.len(),
            spawned: self.population.total_spawned() - spawned_before,
            live_cells: self.grid.live_count(),
            generation: self.grid.generation(),
        };
        self.emit_run_summary(&summary);
        summary
    }

    fn emit_population_metrics(&self, report: &TickReport) {
        info!(
            event = "population_metrics",
            tick = report.tick,
            population = report.population,
            max_population = self.population.max_population(),
            total_spawned = self.population.total_spawned(),
            live_cells = report.live_cells,
            "Population snapshot"
        );

        event!(
            Level::DEBUG,
            gauge_name = "population_total",
            gauge_value = report.population,
            tick = report.tick,
            "Population gauge"
        );
    }

    fn emit_run_summary(&self, summary: &RunSummary) {
        info!(
            event = "run_summary",
            ticks = summary.ticks,
            final_tick = self.tick,
            final_population = summary.final_population,
            spawned = summary.spawned,
            live_cells = summary.live_cells,
            generation = summary.generation,
            "Run complete"
        );
    }

    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Mutable access for animation bookkeeping
    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }
}
