//! Game state and core simulation types
//!
//! One owned `GameState` holds everything a run needs; there are no globals.
//! The tick driver is its only writer.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::item::Item;
use super::level::{Docks, GameStatus, Modal, RosterView};
use super::obstacle::{Obstacle, SpeedRange, spawn_wave};
use super::player::Player;
use crate::config::ValidConfig;

/// Something the host may want to react to, drained after each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ItemCollected { player: usize },
    Collision { player: usize },
    LevelWon { player: usize, col: usize },
    GameWon { player: usize, col: usize },
    Notify { modal: Modal, visible: bool },
    Reset,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: ValidConfig,
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub status: GameStatus,
    /// Dock slots filled this run
    pub docks: Docks,
    /// Relay roster in turn order
    pub players: Vec<Player>,
    /// Index of the player receiving input
    pub active: usize,
    pub obstacles: Vec<Obstacle>,
    /// Speed bounds of the current bug wave
    pub wave: SpeedRange,
    pub item: Item,
    /// Ticks left before a collision resets the level
    pub loss_ticks: u32,
    /// Full reset requested; applied at the end of the next tick
    pub reset_requested: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(config: ValidConfig, seed: u64) -> Self {
        let grid = Grid::new(&config);
        let mut rng = Pcg32::seed_from_u64(seed);
        let wave = speed_range(&config, 0);
        let obstacles = spawn_wave(&config, &grid, wave, &mut rng);
        let item = Item::spawn(&config, &mut rng);

        let mut state = Self {
            docks: Docks::new(config.num_cols),
            players: create_roster(&config, &grid),
            active: 0,
            obstacles,
            wave,
            item,
            grid,
            seed,
            rng,
            config,
            status: GameStatus::Playing,
            loss_ticks: 0,
            reset_requested: false,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.normalize_order();
        log::info!("New game: seed {}, {} players", seed, state.players.len());
        state
    }

    /// Rebuild docks, roster, bugs and gear; the RNG stream continues
    pub fn reinitialize(&mut self) {
        self.docks = Docks::new(self.config.num_cols);
        self.players = create_roster(&self.config, &self.grid);
        self.active = 0;
        self.regenerate_obstacles();
        self.item = Item::spawn(&self.config, &mut self.rng);
        self.status = GameStatus::Playing;
        self.loss_ticks = 0;
        self.reset_requested = false;
        log::info!("Game reset");
    }

    /// Ask for a full reset (idempotent)
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active]
    }

    pub fn roster(&self) -> RosterView {
        RosterView {
            active: self.active,
            len: self.players.len(),
        }
    }

    /// Hand control to the next player; returns false on the last one
    pub fn advance_roster(&mut self) -> bool {
        let next = self.active + 1;
        if next >= self.players.len() {
            log::warn!("No player after {}", self.active);
            return false;
        }
        self.players[self.active].active = false;
        self.active = next;
        let player = &mut self.players[next];
        player.active = true;
        player.visible = true;
        log::info!("Player {} up", next);
        true
    }

    /// Fresh bug wave scaled to the active player's turn
    pub fn regenerate_obstacles(&mut self) {
        self.wave = speed_range(&self.config, self.active);
        self.obstacles = spawn_wave(&self.config, &self.grid, self.wave, &mut self.rng);
        self.normalize_order();
        log::info!(
            "Bug wave for player {}: {:.0}-{:.0} px/s",
            self.active,
            self.wave.min,
            self.wave.max
        );
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Keep bugs in lane order for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.lane);
    }

    /// Serializable summary of the run
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            time_ticks: self.time_ticks,
            status: self.status,
            active: self.active,
            docks: self.docks.as_slice().to_vec(),
            players: self
                .players
                .iter()
                .filter(|p| p.visible)
                .map(|p| (p.row, p.col))
                .collect(),
            item: self.item.cell(),
            item_collected: self.item.collected,
            obstacles: self.obstacles.len(),
        }
    }
}

/// Headless view of a game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub time_ticks: u64,
    pub status: GameStatus,
    pub active: usize,
    pub docks: Vec<bool>,
    /// Cells of every visible player
    pub players: Vec<(usize, usize)>,
    pub item: Option<(usize, usize)>,
    pub item_collected: bool,
    pub obstacles: usize,
}

fn speed_range(config: &ValidConfig, player_index: usize) -> SpeedRange {
    let (min, max) = config.speed_range(player_index);
    SpeedRange { min, max }
}

/// Roster with only the first player active and shown
fn create_roster(config: &ValidConfig, grid: &Grid) -> Vec<Player> {
    let mut players: Vec<Player> = (0..config.roster_size)
        .map(|id| Player::new(id, config, grid))
        .collect();
    if let Some(first) = players.first_mut() {
        first.active = true;
        first.visible = true;
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(ValidConfig::default(), 12345);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.players.len(), 5);
        assert_eq!(state.active, 0);
        assert!(state.players[0].active && state.players[0].visible);
        assert!(state.players[1..].iter().all(|p| !p.active && !p.visible));
        assert_eq!(state.docks.filled_count(), 0);
        assert_eq!(state.obstacles.len(), 21);
        assert_eq!(state.wave, SpeedRange { min: 50.0, max: 75.0 });
        assert!(state.item.cell().is_some());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(ValidConfig::default(), 99);
        let b = GameState::new(ValidConfig::default(), 99);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.item, b.item);
    }

    #[test]
    fn test_advance_roster_bounds() {
        let mut state = GameState::new(ValidConfig::default(), 1);
        for expected in 1..5 {
            assert!(state.advance_roster());
            assert_eq!(state.active, expected);
            assert!(state.players[expected].active);
            assert!(!state.players[expected - 1].active);
            assert!(state.players[expected - 1].visible);
        }
        assert!(!state.advance_roster());
        assert_eq!(state.active, 4);
    }

    #[test]
    fn test_wave_at_column_limit_builds() {
        let mut config = crate::config::GameConfig::default();
        config.wave.first_index = i32::MAX - 6;
        config.wave.spacing = 1;
        config.wave.jitter = 0;
        let config = config.validate().unwrap();

        let state = GameState::new(config, 8);
        assert_eq!(state.obstacles.len(), 21);
        assert!(state.obstacles.iter().all(|o| o.x >= o.bounds.min && o.x <= o.bounds.max));
    }

    #[test]
    fn test_reinitialize_clears_progress() {
        let mut state = GameState::new(ValidConfig::default(), 5);
        state.docks.fill(1);
        state.advance_roster();
        state.item.collect();
        state.request_reset();

        state.reinitialize();
        assert_eq!(state.active, 0);
        assert_eq!(state.docks.filled_count(), 0);
        assert!(!state.item.collected);
        assert!(!state.reset_requested);
        assert!(!state.players[1].visible);
    }
}
