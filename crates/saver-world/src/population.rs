//! Capacity-bounded population of bouncing entities.
//!
//! Entities are advanced in parallel on the rayon pool. Any entity that bounces
//! may claim the tick's single spawn slot; the new entity is appended only after
//! every per-entity update has finished, so no worker ever sees the backing
//! storage grow underneath it.

use crate::animation::{AnimationState, FrameDelays};
use crate::entity::Entity;
use parking_lot::Mutex;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use saver_core::{Error, PopulationConfig, Result, Size, Vec2};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument, trace};

/// Largest speed, per axis, of a spawned entity
const MAX_SPAWN_SPEED: i32 = 7;

/// Upper bound on storage reserved up front
const MAX_RESERVED: usize = 4096;

/// The single per-tick permission to grow the population
#[derive(Debug)]
pub struct SpawnSlot {
    claimed: AtomicBool,
    guard: Mutex<bool>,
    max_population: usize,
}

impl SpawnSlot {
    pub fn new(max_population: usize) -> Self {
        Self {
            claimed: AtomicBool::new(false),
            guard: Mutex::new(false),
            max_population,
        }
    }

    /// Claim the slot if nobody has yet and `population` is under the cap.
    ///
    /// Exactly one caller wins per slot, however many race for it.
    pub fn try_claim(&self, population: usize) -> bool {
        if self.claimed.load(Ordering::Acquire) {
            return false;
        }

        let mut claimed = self.guard.lock();
        // Re-check under the lock
        if *claimed || population >= self.max_population {
            return false;
        }
        *claimed = true;
        self.claimed.store(true, Ordering::Release);
        true
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

/// What happened during one `Population::advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Entities that hit at least one wall
    pub bounces: usize,
    /// Index of the entity appended this tick
    pub spawned: Option<usize>,
}

#[derive(Debug)]
pub struct Population {
    entities: Vec<Entity>,
    animations: Vec<AnimationState>,
    boundary: Size,
    footprint: Size,
    max_population: usize,
    rng: ChaCha8Rng,
    total_spawned: u64,
}

impl Population {
    /// Start with the configured seed entity
    pub fn new(config: &PopulationConfig, seed: u64) -> Result<Self> {
        let seed_entity = Entity::new(config.seed_entity.position, config.seed_entity.velocity);
        Self::with_entities(config, vec![seed_entity], seed)
    }

    /// Start from an explicit set of entities
    pub fn with_entities(config: &PopulationConfig, entities: Vec<Entity>, seed: u64) -> Result<Self> {
        config.validate()?;
        if entities.len() > config.max_population {
            return Err(Error::InvalidConfig(format!(
                "{} initial entities exceed the maximum population of {}",
                entities.len(),
                config.max_population
            )));
        }

        let reserve = config.max_population.min(MAX_RESERVED);
        let mut storage = Vec::with_capacity(reserve);
        storage.extend(entities);
        let mut animations = Vec::with_capacity(reserve);
        animations.resize(storage.len(), AnimationState::default());

        Ok(Self {
            entities: storage,
            animations,
            boundary: config.boundary,
            footprint: config.footprint,
            max_population: config.max_population,
            rng: ChaCha8Rng::seed_from_u64(seed),
            total_spawned: 0,
        })
    }

    /// Move every entity one step, bounce off the walls, and spawn at most one new entity.
    #[instrument(level = "trace", skip(self), fields(population = self.entities.len()))]
    pub fn advance(&mut self) -> TickOutcome {
        let boundary = self.boundary;
        let footprint = self.footprint;
        let population = self.entities.len();
        let slot = SpawnSlot::new(self.max_population);

        let bounces: usize = self
            .entities
            .par_iter_mut()
            .map(|entity| {
                let bounce = entity.advance(boundary, footprint);
                if bounce.any() {
                    slot.try_claim(population);
                }
                usize::from(bounce.any())
            })
            .sum();

        let spawned = slot.is_claimed().then(|| self.spawn());

        TickOutcome { bounces, spawned }
    }

    fn spawn(&mut self) -> usize {
        let x = self.rng.gen_range(0..self.boundary.width - self.footprint.width);
        let y = self.rng.gen_range(0..self.boundary.height - self.footprint.height);
        let velocity = Vec2::new(random_speed(&mut self.rng), random_speed(&mut self.rng));

        let entity = Entity {
            position: Vec2::new(x as f32, y as f32),
            velocity,
            flipped: velocity.x < 0.0,
        };

        self.entities.push(entity);
        self.animations.push(AnimationState::default());
        self.total_spawned += 1;

        let index = self.entities.len() - 1;
        debug!(
            index,
            position = %entity.position,
            velocity = %entity.velocity,
            population = self.entities.len(),
            "Spawned entity"
        );
        index
    }

    /// Advance every entity's animation frame to `now_ms`
    pub fn animate(&mut self, now_ms: u64, delays: &FrameDelays) {
        self.animations.par_iter_mut().for_each(|state| {
            state.advance(now_ms, delays);
        });
        trace!(now_ms, "Advanced animation frames");
    }

    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn animation_states(&self) -> &[AnimationState] {
        &self.animations
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.max_population
    }

    pub fn max_population(&self) -> usize {
        self.max_population
    }

    pub fn boundary(&self) -> Size {
        self.boundary
    }

    pub fn footprint(&self) -> Size {
        self.footprint
    }

    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }
}

/// Uniform magnitude in 1..=7 with a uniform sign
fn random_speed<R: Rng>(rng: &mut R) -> f32 {
    let magnitude = rng.gen_range(1..=MAX_SPAWN_SPEED);
    let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
    (sign * magnitude) as f32
}
