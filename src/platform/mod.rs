//! Platform abstraction layer
//!
//! The host (browser canvas, SDL window, test harness) supplies:
//! - A renderer that draws sprites by id at pixel positions
//! - A resource loader that preloads sprite images
//! - A notifier that shows and hides the help / game-won dialogs
//! - Key-release events, mapped here to logical input actions

use glam::Vec2;

pub use crate::sim::Modal;
use crate::sim::{Direction, GameState, Grid, Move};

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    WaterTile,
    WoodTile,
    StoneTile,
    GrassTile,
    BugForward,
    BugBackward,
    Gear,
    /// Player skin, indexed into `PLAYER_SKINS`
    Player(usize),
}

/// Runner skins in roster order (wraps for larger rosters)
pub const PLAYER_SKINS: [&str; 5] = [
    "images/char-cat-girl.png",
    "images/char-boy.png",
    "images/char-horn-girl.png",
    "images/char-pink-girl.png",
    "images/char-princess-girl.png",
];

impl SpriteId {
    /// Image path relative to the asset root
    pub fn path(&self) -> &'static str {
        match self {
            SpriteId::WaterTile => "images/water-block.png",
            SpriteId::WoodTile => "images/wood-block.png",
            SpriteId::StoneTile => "images/stone-block.png",
            SpriteId::GrassTile => "images/grass-block.png",
            SpriteId::BugForward => "images/enemy-bug-ltr.png",
            SpriteId::BugBackward => "images/enemy-bug-rtl.png",
            SpriteId::Gear => "images/fishing-pole.png",
            SpriteId::Player(skin) => PLAYER_SKINS[skin % PLAYER_SKINS.len()],
        }
    }

    pub fn for_player(id: usize) -> Self {
        SpriteId::Player(id % PLAYER_SKINS.len())
    }

    pub fn for_bug(direction: Direction) -> Self {
        match direction {
            Direction::Forward => SpriteId::BugForward,
            Direction::Backward => SpriteId::BugBackward,
        }
    }

    /// Everything to load before the first frame
    pub fn preload_list() -> Vec<SpriteId> {
        let mut sprites = vec![
            SpriteId::StoneTile,
            SpriteId::WaterTile,
            SpriteId::GrassTile,
            SpriteId::WoodTile,
            SpriteId::BugForward,
            SpriteId::BugBackward,
            SpriteId::Gear,
        ];
        sprites.extend((0..PLAYER_SKINS.len()).map(SpriteId::Player));
        sprites
    }
}

/// Draws sprites; the core never touches pixel data
pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self) {}

    /// Draw `sprite` with its top-left corner at `pos`
    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2);
}

/// Loads sprite images ahead of the first frame
///
/// The host reports completion through [`crate::Game::on_ready`].
pub trait ResourceLoader {
    fn preload(&mut self, sprites: &[SpriteId]);
}

/// Shows or hides host dialogs
pub trait Notifier {
    fn notify(&mut self, modal: Modal, visible: bool);
}

/// Logical action from one physical key release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Cancel,
    Restart,
}

impl InputAction {
    /// Map a DOM `keyCode` (arrows, Enter, Escape, R)
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(InputAction::Left),
            38 => Some(InputAction::Up),
            39 => Some(InputAction::Right),
            40 => Some(InputAction::Down),
            13 => Some(InputAction::Confirm),
            27 => Some(InputAction::Cancel),
            82 => Some(InputAction::Restart),
            _ => None,
        }
    }

    /// Movement actions go to the active player; the rest bypass it
    pub fn as_move(self) -> Option<Move> {
        match self {
            InputAction::Left => Some(Move::Left),
            InputAction::Right => Some(Move::Right),
            InputAction::Up => Some(Move::Up),
            InputAction::Down => Some(Move::Down),
            InputAction::Confirm | InputAction::Cancel | InputAction::Restart => None,
        }
    }
}

/// Display size that fits the canvas in the window, keeping its aspect
/// ratio and never scaling above native size
pub fn fit_to_window(window: Vec2, canvas: Vec2) -> Vec2 {
    if window.y / window.x > canvas.y / canvas.x {
        // Window is taller than the canvas: width is the limit
        if window.x < canvas.x {
            Vec2::new(window.x, canvas.y / canvas.x * window.x)
        } else {
            canvas
        }
    } else if window.y < canvas.y {
        Vec2::new(canvas.x / canvas.y * window.y, window.y)
    } else {
        canvas
    }
}

/// Background tile for a grid row
fn tile_for_row(grid: &Grid, row: usize) -> SpriteId {
    if row == 0 {
        SpriteId::GrassTile
    } else if grid.is_lane(row) {
        SpriteId::StoneTile
    } else if row == grid.goal_row {
        SpriteId::WoodTile
    } else {
        SpriteId::WaterTile
    }
}

/// Draw one frame: tiles, then gear, bugs and visible players
pub fn render_scene(state: &GameState, renderer: &mut impl Renderer) {
    let grid = &state.grid;
    renderer.clear();

    // Tiles are laid out top-down
    for row in (0..grid.num_rows).rev() {
        let sprite = tile_for_row(grid, row);
        let y = (grid.num_rows - 1 - row) as f32 * grid.row_height;
        for col in 0..grid.num_cols {
            renderer.draw_sprite(sprite, Vec2::new(grid.col_x(col as f32), y));
        }
    }

    if let Some((row, col)) = state.item.cell() {
        renderer.draw_sprite(SpriteId::Gear, grid.to_pixel(row, col));
    }

    for obstacle in &state.obstacles {
        renderer.draw_sprite(SpriteId::for_bug(obstacle.direction), Vec2::new(obstacle.x, obstacle.y));
    }

    for player in state.players.iter().filter(|p| p.visible) {
        renderer.draw_sprite(SpriteId::for_player(player.id), player.pos);
    }
}
