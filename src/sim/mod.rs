//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (bugs by lane, players by roster index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod item;
pub mod level;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contacts, Hitbox, detect};
pub use grid::Grid;
pub use item::Item;
pub use level::{Docks, Effect, GameStatus, Modal, Signal, Transition, transition};
pub use obstacle::{Direction, Obstacle, SpeedRange, spawn_wave};
pub use player::{Move, MoveOutcome, Player};
pub use state::{GameEvent, GameState, Snapshot};
pub use tick::{TickInput, apply_signal, tick};
