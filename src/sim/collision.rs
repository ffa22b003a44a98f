//! Collision detection for sprites on the lane grid
//!
//! Bugs and players collide by pixel bounding boxes. Sprites carry transparent
//! padding, so each entity type has its own hitbox inset from the sprite
//! origin. Gear pickup is cell-exact and never uses pixels.
//!
//! Everything here is pure: detection reports contacts, the level state
//! machine decides what they mean.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::item::Item;
use super::obstacle::Obstacle;
use super::player::Player;
use crate::consts::*;

/// Axis-aligned bounding box in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Strict overlap test; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Hitbox dimensions relative to a sprite origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub left_offset: f32,
    pub top_offset: f32,
}

impl Hitbox {
    /// Place the hitbox for a sprite drawn at `origin`
    #[inline]
    pub fn at(&self, origin: Vec2) -> Aabb {
        Aabb::new(
            origin.x + self.left_offset,
            origin.y + self.top_offset,
            self.width,
            self.height,
        )
    }
}

pub const BUG_HITBOX: Hitbox = Hitbox {
    width: BUG_WIDTH,
    height: BUG_HEIGHT,
    left_offset: BUG_LEFT_OFFSET,
    top_offset: BUG_TOP_OFFSET,
};

pub const PLAYER_HITBOX: Hitbox = Hitbox {
    width: PLAYER_WIDTH,
    height: PLAYER_HEIGHT,
    left_offset: PLAYER_LEFT_OFFSET,
    top_offset: PLAYER_TOP_OFFSET,
};

/// Contacts found for the active player in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Player stands on the gear's cell
    pub item_picked: bool,
    /// A bug overlaps the player
    pub hit: bool,
}

/// Gear pickup: exact cell match, never pixels
#[inline]
pub fn item_contact(item: &Item, player: &Player) -> bool {
    item.cell() == Some((player.row, player.col))
}

/// First bug overlapping the player, if any
pub fn obstacle_contact<'a>(obstacles: &'a [Obstacle], player: &Player) -> Option<&'a Obstacle> {
    let player_box = player.hitbox();
    obstacles.iter().find(|o| o.hitbox().overlaps(&player_box))
}

/// Run every check against the active player
pub fn detect(obstacles: &[Obstacle], item: &Item, player: &Player) -> Contacts {
    Contacts {
        item_picked: item_contact(item, player),
        hit: obstacle_contact(obstacles, player).is_some(),
    }
}
