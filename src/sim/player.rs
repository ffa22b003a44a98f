//! Player movement on the grid

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, PLAYER_HITBOX};
use super::grid::Grid;
use super::level::Docks;
use crate::config::ValidConfig;

/// One grid step requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// Result of handling one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Off the grid or into a dock the player may not enter
    Rejected,
    Moved,
    /// Stepped into the dock at this column while carrying the gear
    Goal(usize),
}

/// A relay runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Roster index
    pub id: usize,
    pub row: usize,
    pub col: usize,
    /// Sprite origin, derived from (row, col)
    pub pos: Vec2,
    /// Receives input and is checked for collisions
    pub active: bool,
    /// Drawn by the renderer
    pub visible: bool,
    start_col: usize,
}

impl Player {
    pub fn new(id: usize, config: &ValidConfig, grid: &Grid) -> Self {
        Self {
            id,
            row: 0,
            col: config.start_col,
            pos: grid.to_pixel(0, config.start_col),
            active: false,
            visible: false,
            start_col: config.start_col,
        }
    }

    /// Apply a move, rejecting anything that would leave the grid
    ///
    /// Stepping up into the goal row needs the gear and an empty dock in
    /// the current column.
    pub fn handle_input(&mut self, mv: Move, grid: &Grid, item_collected: bool, docks: &Docks) -> MoveOutcome {
        let moved = match mv {
            Move::Left if self.col > 0 => {
                self.col -= 1;
                true
            }
            Move::Right if self.col + 1 < grid.num_cols => {
                self.col += 1;
                true
            }
            Move::Down if self.row > 0 => {
                self.row -= 1;
                true
            }
            Move::Up if self.row + 1 < grid.goal_row => {
                self.row += 1;
                true
            }
            Move::Up if self.row + 1 == grid.goal_row && item_collected && !docks.is_filled(self.col) => {
                self.row += 1;
                true
            }
            _ => false,
        };

        if !moved {
            log::debug!("Player {} move {:?} rejected at ({}, {})", self.id, mv, self.row, self.col);
            return MoveOutcome::Rejected;
        }

        self.update(grid);
        if self.row == grid.goal_row && item_collected {
            MoveOutcome::Goal(self.col)
        } else {
            MoveOutcome::Moved
        }
    }

    /// Recompute the pixel position from the grid cell
    pub fn update(&mut self, grid: &Grid) {
        self.pos = grid.to_pixel(self.row, self.col);
    }

    /// Back to the start cell
    pub fn restart(&mut self, grid: &Grid) {
        self.row = 0;
        self.col = self.start_col;
        self.update(grid);
    }

    /// Collision box in canvas pixels
    pub fn hitbox(&self) -> Aabb {
        PLAYER_HITBOX.at(self.pos)
    }
}
