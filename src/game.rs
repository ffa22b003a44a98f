//! Frame driver
//!
//! Connects a host to the simulation: waits for sprites to load, buffers the
//! latest key release, turns frame timestamps into fixed simulation steps and
//! forwards dialog requests to the notifier.

use crate::config::ValidConfig;
use crate::consts::*;
use crate::platform::{InputAction, Modal, Notifier, Renderer, ResourceLoader, SpriteId, render_scene};
use crate::sim::{GameEvent, GameState, GameStatus, TickInput, tick};

/// Game instance holding all state
pub struct Game {
    config: ValidConfig,
    seed: u64,
    /// Built once resources are ready
    state: Option<GameState>,
    accumulator: f32,
    last_time: Option<f64>,
    input: TickInput,
    help_visible: bool,
}

impl Game {
    /// Create the game and start preloading its sprites
    pub fn new(config: ValidConfig, seed: u64, loader: &mut impl ResourceLoader) -> Self {
        loader.preload(&SpriteId::preload_list());
        Self {
            config,
            seed,
            state: None,
            accumulator: 0.0,
            last_time: None,
            input: TickInput::default(),
            help_visible: false,
        }
    }

    /// Resources finished loading; starts the game exactly once
    pub fn on_ready(&mut self) {
        if self.state.is_some() {
            log::warn!("Resources reported ready twice; ignoring");
            return;
        }
        self.state = Some(GameState::new(self.config.clone(), self.seed));
        log::info!("Dock Relay running!");
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// Current simulation state, once running
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Handle one key release; moves wait for the next tick
    pub fn key_released(&mut self, action: InputAction, notifier: &mut impl Notifier) {
        let Some(state) = self.state.as_ref() else {
            return;
        };

        if let Some(mv) = action.as_move() {
            // Only the latest unconsumed move is kept
            self.input.mv = Some(mv);
            return;
        }

        match action {
            InputAction::Restart => self.input.reset = true,
            InputAction::Confirm | InputAction::Cancel => {
                if self.help_visible {
                    self.help_visible = false;
                    notifier.notify(Modal::Help, false);
                }
                // Closing the game-won dialog starts a new run
                if state.status == GameStatus::GameWon {
                    self.input.reset = true;
                }
            }
            _ => {}
        }
    }

    /// Show or hide the help dialog
    pub fn toggle_help(&mut self, notifier: &mut impl Notifier) {
        self.help_visible = !self.help_visible;
        notifier.notify(Modal::Help, self.help_visible);
    }

    /// Run simulation ticks for a host frame at `time_ms`
    ///
    /// Returns the events produced during this frame.
    pub fn frame(&mut self, time_ms: f64, notifier: &mut impl Notifier) -> Vec<GameEvent> {
        let Some(state) = self.state.as_mut() else {
            log::warn!("Frame before resources are ready");
            return Vec::new();
        };

        let dt = match self.last_time {
            Some(last) => (((time_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
        }

        let events = state.take_events();
        for event in &events {
            if let GameEvent::Notify { modal, visible } = *event {
                notifier.notify(modal, visible);
            }
        }
        events
    }

    /// Draw the current frame
    pub fn render(&self, renderer: &mut impl Renderer) {
        if let Some(state) = &self.state {
            render_scene(state, renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Item;

    #[derive(Default)]
    struct Loader {
        requested: Vec<SpriteId>,
    }

    impl ResourceLoader for Loader {
        fn preload(&mut self, sprites: &[SpriteId]) {
            self.requested.extend_from_slice(sprites);
        }
    }

    #[derive(Default)]
    struct Dialogs {
        calls: Vec<(Modal, bool)>,
    }

    impl Notifier for Dialogs {
        fn notify(&mut self, modal: Modal, visible: bool) {
            self.calls.push((modal, visible));
        }
    }

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn ready_game() -> (Game, Dialogs) {
        let mut loader = Loader::default();
        let mut game = Game::new(ValidConfig::default(), 42, &mut loader);
        assert_eq!(loader.requested.len(), 12);
        game.on_ready();
        let mut dialogs = Dialogs::default();
        game.frame(0.0, &mut dialogs);
        (game, dialogs)
    }

    #[test]
    fn test_gated_on_ready() {
        let mut loader = Loader::default();
        let mut game = Game::new(ValidConfig::default(), 1, &mut loader);
        let mut dialogs = Dialogs::default();

        assert!(!game.is_ready());
        assert!(game.frame(0.0, &mut dialogs).is_empty());
        game.key_released(InputAction::Up, &mut dialogs);
        assert!(game.state().is_none());

        game.on_ready();
        let first = game.state().unwrap().obstacles.clone();
        game.on_ready();
        assert_eq!(game.state().unwrap().obstacles, first);
    }

    #[test]
    fn test_fixed_steps_per_frame() {
        let (mut game, mut dialogs) = ready_game();
        game.frame(FRAME_MS * 3.0 + 0.5, &mut dialogs);
        assert_eq!(game.state().unwrap().time_ticks, 3);

        // Long stalls are clamped
        game.frame(FRAME_MS * 3.0 + 10_000.0, &mut dialogs);
        assert_eq!(game.state().unwrap().time_ticks, 3 + 6);
    }

    #[test]
    fn test_latest_move_wins_and_is_consumed_once() {
        let (mut game, mut dialogs) = ready_game();
        game.state.as_mut().unwrap().obstacles.clear();

        game.key_released(InputAction::Left, &mut dialogs);
        game.key_released(InputAction::Right, &mut dialogs);
        game.frame(FRAME_MS * 2.0 + 0.5, &mut dialogs);

        let state = game.state().unwrap();
        assert_eq!(state.time_ticks, 2);
        assert_eq!(state.active_player().col, 3);
    }

    #[test]
    fn test_help_toggle_and_dismiss() {
        let (mut game, mut dialogs) = ready_game();
        game.toggle_help(&mut dialogs);
        game.key_released(InputAction::Cancel, &mut dialogs);
        // Nothing left to hide
        game.key_released(InputAction::Confirm, &mut dialogs);
        assert_eq!(dialogs.calls, vec![(Modal::Help, true), (Modal::Help, false)]);
    }

    #[test]
    fn test_dismissing_game_won_resets() {
        let mut loader = Loader::default();
        let config = crate::config::GameConfig {
            roster_size: 1,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut game = Game::new(config, 7, &mut loader);
        game.on_ready();
        let mut dialogs = Dialogs::default();
        game.frame(0.0, &mut dialogs);

        {
            let state = game.state.as_mut().unwrap();
            state.obstacles.clear();
            state.item = Item::at(1, 2);
        }

        let mut now = 0.0;
        // Gear on row 1, dock on the goal row
        for _ in 0..game.state().unwrap().grid.goal_row {
            game.key_released(InputAction::Up, &mut dialogs);
            now += FRAME_MS + 0.01;
            game.frame(now, &mut dialogs);
        }
        assert_eq!(game.state().unwrap().status, GameStatus::GameWon);
        assert_eq!(dialogs.calls, vec![(Modal::GameWon, true)]);

        game.key_released(InputAction::Confirm, &mut dialogs);
        now += FRAME_MS + 0.01;
        game.frame(now, &mut dialogs);

        let state = game.state().unwrap();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.docks.filled_count(), 0);
        assert_eq!(dialogs.calls, vec![(Modal::GameWon, true), (Modal::GameWon, false)]);
    }
}
