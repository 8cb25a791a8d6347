//! Double-buffered Game of Life grid.
//!
//! Cells beyond the border are always dead; the grid does not wrap.

use crate::patterns::Pattern;
use rand::Rng;
use rayon::prelude::*;
use saver_core::{Error, GridConfig, Result, SeedConfig};
use tracing::debug;

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Conway's rule: survive on 2 or 3, birth on exactly 3
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}

/// A fixed-size boolean cell grid holding the current and the next generation
#[derive(Debug, Clone)]
pub struct LifeGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
    generation: u64,
}

impl LifeGrid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        GridConfig { width, height }.validate()?;
        let size = width * height;
        Ok(Self {
            width,
            height,
            cells: vec![false; size],
            next: vec![false; size],
            generation: 0,
        })
    }

    /// Create a grid from configuration and seed it with random patterns
    pub fn from_config<R: Rng>(config: &GridConfig, seed: &SeedConfig, rng: &mut R) -> Result<Self> {
        let mut grid = Self::new(config.width, config.height)?;
        grid.initialize(seed, rng)?;
        Ok(grid)
    }

    /// Clear the grid and stamp the requested number of each pattern at random origins.
    ///
    /// Origins are drawn so that every pattern lies fully inside the grid. Overlapping
    /// stamps are allowed; seeding only ever sets cells alive.
    pub fn initialize<R: Rng>(&mut self, seed: &SeedConfig, rng: &mut R) -> Result<()> {
        self.clear();

        let placements = [
            (Pattern::GLIDER, seed.num_gliders),
            (Pattern::GUN, seed.num_guns),
            (Pattern::SMALL_GLIDER, seed.num_small_gliders),
        ];

        // Reject before stamping so a failed seed leaves an empty grid
        for (pattern, count) in placements {
            if count > 0 && !pattern.fits_in(self.width, self.height) {
                return Err(self.does_not_fit(&pattern));
            }
        }

        for (pattern, count) in placements {
            let (w, h) = pattern.extent();
            for _ in 0..count {
                let x = rng.gen_range(0..=self.width - w);
                let y = rng.gen_range(0..=self.height - h);
                self.stamp_unchecked(&pattern, x, y);
            }
        }

        debug!(
            gliders = seed.num_gliders,
            guns = seed.num_guns,
            small_gliders = seed.num_small_gliders,
            live_cells = self.live_count(),
            "Seeded grid"
        );

        Ok(())
    }

    /// Place a pattern with its top-left corner at `(x, y)`
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) -> Result<()> {
        let (w, h) = pattern.extent();
        let fits = x
            .checked_add(w)
            .zip(y.checked_add(h))
            .map_or(false, |(right, bottom)| right <= self.width && bottom <= self.height);
        if !fits {
            return Err(self.does_not_fit(pattern));
        }
        self.stamp_unchecked(pattern, x, y);
        Ok(())
    }

    fn stamp_unchecked(&mut self, pattern: &Pattern, x: usize, y: usize) {
        for &(dx, dy) in pattern.cells {
            let index = self.index(x + dx, y + dy);
            self.cells[index] = true;
        }
    }

    fn does_not_fit(&self, pattern: &Pattern) -> Error {
        Error::PatternDoesNotFit {
            pattern: pattern.name.to_string(),
            width: self.width,
            height: self.height,
        }
    }

    /// Advance one generation.
    ///
    /// Rows of the next generation are computed in parallel from the current one,
    /// then the buffers are swapped.
    pub fn step(&mut self) {
        let width = self.width;
        let height = self.height;
        let current = &self.cells;

        self.next
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let alive = current[y * width + x];
                    let neighbors = live_neighbors(current, width, height, x, y);
                    *cell = next_state(alive, neighbors);
                }
            });

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
    }

    /// Out-of-range coordinates are dead
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.cells[index] = alive;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Row-major view of the settled generation
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Coordinates of every live cell, row by row
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of `step` calls since construction
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

fn live_neighbors(cells: &[bool], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let mut count = 0;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            continue;
        };
        if nx < width && ny < height && cells[ny * width + nx] {
            count += 1;
        }
    }
    count
}
