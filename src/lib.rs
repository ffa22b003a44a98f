//! Dock Relay - A lane-crossing relay arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, obstacles, collisions, game state)
//! - `config`: Validated, data-driven game configuration
//! - `platform`: Host interfaces (renderer, resource loader, notifications, input)
//! - `game`: Frame driver that connects the host to the simulation

pub mod config;
pub mod game;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, GameConfig, ValidConfig};
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame gap (seconds) fed to the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 505.0;
    pub const CANVAS_HEIGHT: f32 = 606.0;

    /// Grid defaults
    pub const NUM_ROWS: usize = 6;
    pub const NUM_COLS: usize = 5;
    pub const CELL_WIDTH: f32 = 101.0;
    pub const ROW_HEIGHT: f32 = 83.0;
    /// Distance from the canvas bottom to the origin of row 0
    pub const BOTTOM_OFFSET: f32 = ROW_HEIGHT * 11.0 / 4.0;

    /// Bug hitbox inside its 101x171 sprite
    pub const BUG_WIDTH: f32 = 97.0;
    pub const BUG_HEIGHT: f32 = 66.0;
    pub const BUG_LEFT_OFFSET: f32 = 1.5;
    pub const BUG_TOP_OFFSET: f32 = 77.5;

    /// Player hitbox inside its 101x171 sprite
    pub const PLAYER_WIDTH: f32 = 61.0;
    pub const PLAYER_HEIGHT: f32 = 76.0;
    pub const PLAYER_LEFT_OFFSET: f32 = 20.0;
    pub const PLAYER_TOP_OFFSET: f32 = 63.5;

    /// Players in a full relay
    pub const ROSTER_SIZE: usize = 5;
    pub const START_COL: usize = 2;
    /// Upper bound on bugs spawned per lane
    pub const MAX_OBSTACLES_PER_LANE: usize = 1024;
}
