//! Dock Relay entry point
//!
//! Natively this runs a headless game driven by a seeded random pilot and
//! prints the final snapshot as JSON. Browser builds embed the library and
//! supply their own renderer, loader and notifier.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dock_relay::consts::SIM_DT;
    use dock_relay::platform::{InputAction, Modal, Notifier, Renderer, ResourceLoader, SpriteId};
    use dock_relay::sim::GameStatus;
    use dock_relay::{Game, GameConfig, ValidConfig};
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Frames to simulate before giving up on a win
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Nothing to fetch headless; reports what a browser would load
    struct LogLoader;

    impl ResourceLoader for LogLoader {
        fn preload(&mut self, sprites: &[SpriteId]) {
            for sprite in sprites {
                log::debug!("Preload {}", sprite.path());
            }
            log::info!("{} sprites ready", sprites.len());
        }
    }

    struct LogNotifier;

    impl Notifier for LogNotifier {
        fn notify(&mut self, modal: Modal, visible: bool) {
            log::info!("{:?} dialog {}", modal, if visible { "shown" } else { "hidden" });
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        draws: usize,
    }

    impl Renderer for CountingRenderer {
        fn draw_sprite(&mut self, _sprite: SpriteId, _pos: Vec2) {
            self.draws += 1;
        }
    }

    /// Pick a move, leaning towards the docks
    fn pilot_move(rng: &mut Pcg32) -> InputAction {
        match rng.random_range(0..10) {
            0..=4 => InputAction::Up,
            5 | 6 => InputAction::Left,
            7 | 8 => InputAction::Right,
            _ => InputAction::Down,
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let config = match std::env::args().nth(1) {
            Some(path) => GameConfig::load(&path)?,
            None => ValidConfig::default(),
        };
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Dock Relay (native) starting with seed {}", seed);

        let mut notifier = LogNotifier;
        let mut renderer = CountingRenderer::default();
        let mut game = Game::new(config, seed, &mut LogLoader);
        game.on_ready();

        let mut pilot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let frame_ms = f64::from(SIM_DT) * 1000.0;
        let mut events = 0;

        for frame in 0..MAX_FRAMES {
            // One keypress every quarter second
            if frame % 15 == 0 {
                game.key_released(pilot_move(&mut pilot), &mut notifier);
            }
            events += game.frame(f64::from(frame) * frame_ms, &mut notifier).len();
            game.render(&mut renderer);

            if game.state().is_some_and(|s| s.status == GameStatus::GameWon) {
                log::info!("Won after {} frames", frame);
                break;
            }
        }

        let state = game
            .state()
            .ok_or_else(|| anyhow::anyhow!("game never became ready"))?;
        log::info!("{} events, {} sprite draws", events, renderer.draws);
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `dock_relay::Game` directly
}
