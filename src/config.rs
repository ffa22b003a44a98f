//! Game configuration
//!
//! Loaded once (from JSON or defaults), validated, then shared read-only with
//! every simulation component. Grid dimensions never change after this point.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration rejected at construction time
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("grid needs at least 4 rows (start, lane, goal, scenery), got {0}")]
    TooFewRows(usize),

    #[error("grid needs at least one column")]
    NoColumns,

    #[error("start column {col} outside 0..{cols}")]
    StartColumnOutOfRange { col: usize, cols: usize },

    #[error("roster must contain at least one player")]
    EmptyRoster,

    #[error("invalid obstacle speed range: base {base}, step {step}, spread {spread}")]
    InvalidSpeedRange { base: f32, step: f32, spread: f32 },

    #[error("obstacle wave needs at least one obstacle per lane and a non-zero spacing")]
    EmptyWave,

    #[error("obstacle jitter must not be negative, got {0}")]
    NegativeJitter(i32),

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("obstacle wave does not fit: {count} per lane from index {first_index}, spacing {spacing}, jitter {jitter}")]
    WaveOutOfRange {
        count: usize,
        first_index: i32,
        spacing: i32,
        jitter: i32,
    },
}

/// Obstacle wave tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Obstacles spawned in every lane
    pub count_per_lane: usize,
    /// Index of the first obstacle in a lane (negative starts them off-screen)
    pub first_index: i32,
    /// Cells between consecutive obstacles before jitter
    pub spacing: i32,
    /// Maximum random extra cells added to each start column
    pub jitter: i32,
    /// Lower speed bound for the first player (pixels/second)
    pub base_speed: f32,
    /// Added to both bounds for every player already through
    pub speed_step: f32,
    /// Width of the speed range
    pub speed_spread: f32,
    /// Off-screen distance (in cells) travelled before wrapping
    pub wrap_margin_cells: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            count_per_lane: 7,
            first_index: -3,
            spacing: 4,
            jitter: 2,
            base_speed: 50.0,
            speed_step: 25.0,
            speed_spread: 25.0,
            wrap_margin_cells: 11.0,
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub num_rows: usize,
    pub num_cols: usize,
    pub cell_width: f32,
    pub row_height: f32,
    /// Distance from canvas bottom to the origin of row 0
    pub bottom_offset: f32,
    /// Column every player starts (and restarts) in
    pub start_col: usize,
    /// Players taking turns in the relay
    pub roster_size: usize,
    /// Ticks the collision frame stays on screen before the level resets
    pub collision_delay_ticks: u32,
    /// RNG seed; `None` lets the host pick one
    pub seed: Option<u64>,
    pub wave: WaveConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            num_rows: NUM_ROWS,
            num_cols: NUM_COLS,
            cell_width: CELL_WIDTH,
            row_height: ROW_HEIGHT,
            bottom_offset: BOTTOM_OFFSET,
            start_col: START_COL,
            roster_size: ROSTER_SIZE,
            collision_delay_ticks: 1,
            seed: None,
            wave: WaveConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<ValidConfig, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<ValidConfig, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check every constraint the simulation relies on
    pub fn validate(self) -> Result<ValidConfig, ConfigError> {
        for (field, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("cell_width", self.cell_width),
            ("row_height", self.row_height),
            ("bottom_offset", self.bottom_offset),
            ("wave.base_speed", self.wave.base_speed),
            ("wave.speed_step", self.wave.speed_step),
            ("wave.speed_spread", self.wave.speed_spread),
            ("wave.wrap_margin_cells", self.wave.wrap_margin_cells),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        for (field, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("cell_width", self.cell_width),
            ("row_height", self.row_height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.num_rows < 4 {
            return Err(ConfigError::TooFewRows(self.num_rows));
        }
        if self.num_cols == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.start_col >= self.num_cols {
            return Err(ConfigError::StartColumnOutOfRange {
                col: self.start_col,
                cols: self.num_cols,
            });
        }
        if self.roster_size == 0 {
            return Err(ConfigError::EmptyRoster);
        }

        let wave = &self.wave;
        if wave.base_speed < 0.0 || wave.speed_step < 0.0 || wave.speed_spread < 0.0 {
            return Err(ConfigError::InvalidSpeedRange {
                base: wave.base_speed,
                step: wave.speed_step,
                spread: wave.speed_spread,
            });
        }
        if wave.count_per_lane == 0 || wave.spacing == 0 {
            return Err(ConfigError::EmptyWave);
        }
        if wave.jitter < 0 {
            return Err(ConfigError::NegativeJitter(wave.jitter));
        }
        if wave.wrap_margin_cells < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "wrap_margin_cells",
                value: wave.wrap_margin_cells,
            });
        }
        if wave_column_span(wave).is_none() {
            return Err(ConfigError::WaveOutOfRange {
                count: wave.count_per_lane,
                first_index: wave.first_index,
                spacing: wave.spacing,
                jitter: wave.jitter,
            });
        }

        // Derived pixel values must stay finite too
        let config = ValidConfig(self);
        let margin = config.wrap_margin();
        if !margin.is_finite() || !(config.canvas_width + 2.0 * margin).is_finite() {
            return Err(ConfigError::NotFinite {
                field: "wrap margin",
                value: margin,
            });
        }
        let (lower, upper) = config.speed_range(config.roster_size - 1);
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "speed range of the last player",
                value: upper,
            });
        }

        Ok(config)
    }
}

/// Smallest and largest obstacle start column a wave can produce, or `None`
/// when a column overflows `i32` or the lane would be unreasonably long
fn wave_column_span(wave: &WaveConfig) -> Option<(i32, i32)> {
    if wave.count_per_lane > MAX_OBSTACLES_PER_LANE {
        return None;
    }
    let count = i32::try_from(wave.count_per_lane).ok()?;
    let last_index = wave.first_index.checked_add(count - 1)?;
    let a = wave.first_index.checked_mul(wave.spacing)?;
    let b = last_index.checked_mul(wave.spacing)?;
    let highest = a.max(b).checked_add(wave.jitter)?;
    Some((a.min(b), highest))
}

/// A configuration that passed [`GameConfig::validate`]
///
/// The simulation only accepts this type, so every index derived from it
/// (goal row, docks, start column) is in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConfig(GameConfig);

impl ValidConfig {
    /// Row of the docks; one scenery row sits above it
    pub fn goal_row(&self) -> usize {
        self.0.num_rows - 2
    }

    /// Rows an item may spawn in (between the start row and the goal row)
    pub fn traversable_rows(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.goal_row() - 1
    }

    /// Wrap margin in pixels
    pub fn wrap_margin(&self) -> f32 {
        self.0.wave.wrap_margin_cells * self.0.cell_width
    }

    /// Speed range for the wave faced by the player at `player_index`
    pub fn speed_range(&self, player_index: usize) -> (f32, f32) {
        let wave = &self.0.wave;
        let lower = wave.base_speed + player_index as f32 * wave.speed_step;
        (lower, lower + wave.speed_spread)
    }
}

impl Default for ValidConfig {
    fn default() -> Self {
        ValidConfig(GameConfig::default())
    }
}

impl std::ops::Deref for ValidConfig {
    type Target = GameConfig;

    fn deref(&self) -> &GameConfig {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GameConfig::default().validate().unwrap();
        assert_eq!(config.goal_row(), 4);
        assert_eq!(config.traversable_rows(), 1..=3);
        assert_eq!(config.wrap_margin(), 1111.0);
        // Indices -3..=3 at 4 cells apart, plus up to 2 cells of jitter
        assert_eq!(wave_column_span(&config.wave), Some((-12, 14)));
    }

    #[test]
    fn test_speed_range_scales_with_player() {
        let config = ValidConfig::default();
        assert_eq!(config.speed_range(0), (50.0, 75.0));
        assert_eq!(config.speed_range(2), (100.0, 125.0));
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "num_rows": 7, "seed": 42 }"#).unwrap();
        assert_eq!(config.num_rows, 7);
        assert_eq!(config.num_cols, NUM_COLS);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.goal_row(), 5);
    }

    #[test]
    fn test_rejects_bad_start_column() {
        let config = GameConfig {
            start_col: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartColumnOutOfRange { col: 5, cols: 5 })
        ));
    }

    #[test]
    fn test_rejects_small_grid_and_empty_roster() {
        let rows = GameConfig {
            num_rows: 3,
            ..Default::default()
        };
        assert!(matches!(rows.validate(), Err(ConfigError::TooFewRows(3))));

        let roster = GameConfig {
            roster_size: 0,
            ..Default::default()
        };
        assert!(matches!(roster.validate(), Err(ConfigError::EmptyRoster)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    fn with_wave(edit: impl FnOnce(&mut WaveConfig)) -> Result<ValidConfig, ConfigError> {
        let mut config = GameConfig::default();
        edit(&mut config.wave);
        config.validate()
    }

    #[test]
    fn test_rejects_non_finite_speed() {
        // 1e39 overflows f32 to infinity
        assert!(matches!(
            GameConfig::from_json(r#"{ "wave": { "base_speed": 1e39 } }"#),
            Err(ConfigError::NotFinite { field: "wave.base_speed", .. })
        ));

        // Finite inputs whose last-player range overflows
        assert!(matches!(
            with_wave(|w| w.speed_step = 1e38),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_speed_range() {
        assert!(matches!(
            with_wave(|w| w.base_speed = -1.0),
            Err(ConfigError::InvalidSpeedRange { .. })
        ));
        assert!(matches!(
            with_wave(|w| w.speed_spread = -5.0),
            Err(ConfigError::InvalidSpeedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_wave_and_negative_jitter() {
        assert!(matches!(
            with_wave(|w| w.count_per_lane = 0),
            Err(ConfigError::EmptyWave)
        ));
        assert!(matches!(
            with_wave(|w| w.spacing = 0),
            Err(ConfigError::EmptyWave)
        ));
        assert!(matches!(
            with_wave(|w| w.jitter = -1),
            Err(ConfigError::NegativeJitter(-1))
        ));
    }

    #[test]
    fn test_rejects_wave_columns_that_overflow() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "wave": { "spacing": 2000000000 } }"#),
            Err(ConfigError::WaveOutOfRange { .. })
        ));
        assert!(matches!(
            with_wave(|w| {
                w.first_index = i32::MAX - 1;
                w.spacing = 1;
            }),
            Err(ConfigError::WaveOutOfRange { .. })
        ));
        assert!(matches!(
            with_wave(|w| w.count_per_lane = MAX_OBSTACLES_PER_LANE + 1),
            Err(ConfigError::WaveOutOfRange { .. })
        ));
    }
}
