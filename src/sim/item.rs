//! The fishing gear every player must carry to the docks

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::config::ValidConfig;

/// Collectible item; its cell is `None` while a player carries it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    cell: Option<(usize, usize)>,
    pub collected: bool,
}

impl Item {
    /// Item resting on a specific cell
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            cell: Some((row, col)),
            collected: false,
        }
    }

    /// Item on a random cell of the traversable band
    pub fn spawn<R: Rng>(config: &ValidConfig, rng: &mut R) -> Self {
        let mut item = Self {
            cell: None,
            collected: false,
        };
        item.try_spawn(config, rng);
        item
    }

    /// `(row, col)`, or `None` while collected
    #[inline]
    pub fn cell(&self) -> Option<(usize, usize)> {
        self.cell
    }

    /// Move to a random cell between the start row and the goal row
    pub fn try_spawn<R: Rng>(&mut self, config: &ValidConfig, rng: &mut R) {
        let row = rng.random_range(config.traversable_rows());
        let col = rng.random_range(0..config.num_cols);
        self.cell = Some((row, col));
    }

    /// Picked up: hidden until the next restart
    pub fn collect(&mut self) {
        self.collected = true;
        self.cell = None;
    }

    /// Put the item back in play
    ///
    /// A soft restart drops a carried item on the player's current cell and
    /// leaves an uncollected item where it is. A fresh restart always picks a
    /// new random cell.
    pub fn restart<R: Rng>(&mut self, player: &Player, fresh: bool, config: &ValidConfig, rng: &mut R) {
        if fresh {
            self.try_spawn(config, rng);
        } else if self.collected {
            self.cell = Some((player.row, player.col));
        }
        self.collected = false;
    }
}
