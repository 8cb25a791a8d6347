//! World simulation engine.
//!
//! Two independent subsystems advanced once per tick: a Game of Life grid
//! and a population of bouncing sprites that may grow when they hit a wall.

pub mod animation;
pub mod entity;
pub mod grid;
pub mod patterns;
pub mod population;
pub mod simulation;

pub use animation::{AnimationState, FrameDelays};
pub use entity::Entity;
pub use grid::LifeGrid;
pub use patterns::Pattern;
pub use population::{Population, TickOutcome};
pub use simulation::{RunSummary, Simulation, TickReport};
