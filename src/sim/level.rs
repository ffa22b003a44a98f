//! Level and game progression
//!
//! A single status enum replaces scattered won/lost flags. [`transition`] is
//! pure: it maps the current status and an incoming signal to the next status
//! plus a list of effects, and the tick driver applies those effects to the
//! owned game state.

use serde::{Deserialize, Serialize};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Active player is crossing
    Playing,
    /// A player filled a dock (passed through within one transition)
    LevelWon,
    /// The last player in the roster filled a dock; final tableau on screen
    GameWon,
    /// Active player was hit; the level resets when the delay runs out
    GameLost,
}

/// Host dialogs the simulation can ask to show or hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modal {
    Help,
    GameWon,
}

/// One dock slot per column; slots only fill until a full reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docks {
    filled: Vec<bool>,
}

impl Docks {
    pub fn new(num_cols: usize) -> Self {
        Self {
            filled: vec![false; num_cols],
        }
    }

    /// Mark the dock at `col` as filled
    ///
    /// Columns come from a validated grid, so `col` is always in range.
    pub fn fill(&mut self, col: usize) {
        debug_assert!(col < self.filled.len(), "dock {} outside 0..{}", col, self.filled.len());
        if let Some(slot) = self.filled.get_mut(col) {
            *slot = true;
        }
    }

    /// Out-of-range columns read as filled so nobody can enter them
    pub fn is_filled(&self, col: usize) -> bool {
        self.filled.get(col).copied().unwrap_or(true)
    }

    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|f| **f).count()
    }

    pub fn len(&self) -> usize {
        self.filled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.filled
    }
}

/// Something that happened to the active player, or a host request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// A bug overlapped the active player
    Collision,
    /// The collision frame has been shown long enough
    LossDelayElapsed,
    /// Active player stepped into a dock while carrying the gear
    GoalReached { player: usize, col: usize },
    /// Restart key or dismissing the game-won dialog
    Reset,
}

/// Side effect requested by a transition, applied in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FillDock(usize),
    /// Respawn the gear (fresh = new random cell)
    RestartItem { fresh: bool },
    /// Active player back to the start cell
    RestartPlayer,
    /// Hand control to the next player in the roster
    AdvanceRoster,
    /// New bug wave for the (new) active player's difficulty
    RegenerateObstacles,
    Notify { modal: Modal, visible: bool },
    /// Rebuild roster, bugs, gear and docks from scratch
    FullReset,
}

/// Roster facts a transition needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterView {
    pub active: usize,
    pub len: usize,
}

impl RosterView {
    #[inline]
    pub fn is_last(&self, id: usize) -> bool {
        id + 1 == self.len
    }
}

/// Next status and the effects to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: GameStatus,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(status: GameStatus) -> Self {
        Self {
            status,
            effects: Vec::new(),
        }
    }
}

/// Level state machine
pub fn transition(status: GameStatus, signal: Signal, roster: RosterView) -> Transition {
    use Effect::*;

    match (status, signal) {
        // A reset supersedes everything, including a pending loss
        (from, Signal::Reset) => {
            let mut effects = Vec::with_capacity(2);
            if from == GameStatus::GameWon {
                effects.push(Notify {
                    modal: Modal::GameWon,
                    visible: false,
                });
            }
            effects.push(FullReset);
            Transition {
                status: GameStatus::Playing,
                effects,
            }
        }

        (GameStatus::Playing, Signal::Collision) => Transition::stay(GameStatus::GameLost),

        (GameStatus::GameLost, Signal::LossDelayElapsed) => Transition {
            status: GameStatus::Playing,
            effects: vec![RestartItem { fresh: false }, RestartPlayer],
        },

        (GameStatus::Playing, Signal::GoalReached { player, col }) if player == roster.active => {
            // Playing -> LevelWon, then straight on to GameWon or Playing
            if roster.is_last(player) {
                Transition {
                    status: GameStatus::GameWon,
                    effects: vec![
                        FillDock(col),
                        Notify {
                            modal: Modal::GameWon,
                            visible: true,
                        },
                        RestartItem { fresh: false },
                    ],
                }
            } else {
                Transition {
                    status: GameStatus::Playing,
                    effects: vec![
                        FillDock(col),
                        AdvanceRoster,
                        RestartItem { fresh: true },
                        RegenerateObstacles,
                    ],
                }
            }
        }

        (status, signal) => {
            log::debug!("Ignoring {:?} while {:?}", signal, status);
            Transition::stay(status)
        }
    }
}
