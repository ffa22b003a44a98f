//! Lane obstacles (the bugs)
//!
//! Each bug keeps its lane for life and slides along it at a constant speed.
//! Lanes are toroidal: a bug that runs `wrap_margin` past one edge of the
//! canvas comes back in from the same distance beyond the opposite edge.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, BUG_HITBOX};
use super::grid::Grid;
use crate::config::ValidConfig;

/// Travel direction along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right
    Forward,
    /// Right to left
    Backward,
}

impl Direction {
    /// Alternate by lane parity so neighbouring lanes run opposite ways
    pub fn for_lane(lane: usize) -> Self {
        if lane % 2 == 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Horizontal extent a lane wraps around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneBounds {
    pub min: f32,
    pub max: f32,
}

impl LaneBounds {
    pub fn new(canvas_width: f32, margin: f32) -> Self {
        Self {
            min: -margin,
            max: canvas_width + margin,
        }
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Fold `x` back into `[min, max)`
    #[inline]
    pub fn wrap(&self, x: f32) -> f32 {
        self.min + (x - self.min).rem_euclid(self.span())
    }
}

/// A single bug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub lane: usize,
    pub x: f32,
    pub y: f32,
    /// Pixels per second
    pub speed: f32,
    pub direction: Direction,
    pub bounds: LaneBounds,
}

impl Obstacle {
    pub fn new(grid: &Grid, lane: usize, x: f32, speed: f32, direction: Direction, margin: f32) -> Self {
        let bounds = LaneBounds::new(grid.canvas_width, margin);
        Self {
            lane,
            x: bounds.wrap(x),
            y: grid.row_y(lane),
            speed,
            direction,
            bounds,
        }
    }

    /// Advance by `dt` seconds, wrapping at the lane bounds
    pub fn update(&mut self, dt: f32) {
        let moved = self.x + self.direction.sign() * self.speed * dt;
        self.x = if moved < self.bounds.min || moved >= self.bounds.max {
            self.bounds.wrap(moved)
        } else {
            moved
        };
    }

    /// Collision box in canvas pixels
    pub fn hitbox(&self) -> Aabb {
        BUG_HITBOX.at(glam::Vec2::new(self.x, self.y))
    }
}

/// Speed bounds a wave was spawned with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

/// Spawn one bug wave across every lane
///
/// Each lane gets one speed drawn from `speed`, the lane-parity direction and
/// `count_per_lane` bugs starting at `index * spacing + jitter` columns, so
/// bugs are neither evenly spaced nor all on screen at once.
pub fn spawn_wave<R: Rng>(
    config: &ValidConfig,
    grid: &Grid,
    speed: SpeedRange,
    rng: &mut R,
) -> Vec<Obstacle> {
    let wave = &config.wave;
    let margin = config.wrap_margin();
    let mut obstacles = Vec::with_capacity(wave.count_per_lane * config.traversable_rows().count());

    for lane in config.traversable_rows() {
        let lane_speed = rng.random_range(speed.min..=speed.max);
        let direction = Direction::for_lane(lane);

        // Column arithmetic is range-checked by `GameConfig::validate`
        for index in (wave.first_index..=i32::MAX).take(wave.count_per_lane) {
            let start_col = index * wave.spacing + rng.random_range(0..=wave.jitter);
            let x = grid.col_x(start_col as f32);
            obstacles.push(Obstacle::new(grid, lane, x, lane_speed, direction, margin));
        }
    }

    log::debug!(
        "Spawned {} bugs at {:.0}-{:.0} px/s",
        obstacles.len(),
        speed.min,
        speed.max
    );
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> Grid {
        Grid::new(&ValidConfig::default())
    }

    fn bug(x: f32, speed: f32, direction: Direction) -> Obstacle {
        Obstacle::new(&grid(), 1, x, speed, direction, 1111.0)
    }

    #[test]
    fn test_single_tick_displacement() {
        let mut obstacle = bug(0.0, 100.0, Direction::Forward);
        obstacle.update(1.0);
        assert_eq!(obstacle.x, 100.0);

        let mut obstacle = bug(0.0, 100.0, Direction::Backward);
        obstacle.update(1.0);
        assert_eq!(obstacle.x, -100.0);
    }

    #[test]
    fn test_wraps_to_opposite_edge() {
        // Bounds are [-1111, 1616); overshoot carries over to the far side
        let mut obstacle = bug(1610.0, 100.0, Direction::Forward);
        obstacle.update(0.1);
        assert!((obstacle.x - (-1107.0)).abs() < 1e-3);

        let mut obstacle = bug(-1105.0, 100.0, Direction::Backward);
        obstacle.update(0.1);
        assert!((obstacle.x - 1612.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_normalizes_offscreen_start() {
        let obstacle = bug(-1212.0, 50.0, Direction::Backward);
        assert!(obstacle.x >= -1111.0 && obstacle.x < 1616.0);
    }

    #[test]
    fn test_spawn_wave_layout() {
        let config = ValidConfig::default();
        let grid = Grid::new(&config);
        let mut rng = Pcg32::seed_from_u64(7);
        let speed = SpeedRange { min: 50.0, max: 75.0 };
        let wave = spawn_wave(&config, &grid, speed, &mut rng);

        assert_eq!(wave.len(), 3 * 7);
        for lane in 1..=3 {
            let lane_bugs: Vec<_> = wave.iter().filter(|o| o.lane == lane).collect();
            assert_eq!(lane_bugs.len(), 7);
            // One speed and one direction per lane
            assert!(lane_bugs.iter().all(|o| o.speed == lane_bugs[0].speed));
            assert!(lane_bugs.iter().all(|o| o.direction == Direction::for_lane(lane)));
            assert!(lane_bugs[0].speed >= 50.0 && lane_bugs[0].speed <= 75.0);
            assert!(lane_bugs.iter().all(|o| o.y == grid.row_y(lane)));
        }
        assert_eq!(Direction::for_lane(1), Direction::Backward);
        assert_eq!(Direction::for_lane(2), Direction::Forward);
    }

    fn torus_distance(a: f32, b: f32, span: f32) -> f32 {
        let d = (a - b).rem_euclid(span);
        d.min(span - d)
    }

    proptest! {
        #[test]
        fn prop_frame_rate_independent(
            start in -1000.0f32..1500.0,
            speed in 0.0f32..400.0,
            forward in any::<bool>(),
            total in 0.0f32..30.0,
            splits in 1usize..64,
        ) {
            let direction = if forward { Direction::Forward } else { Direction::Backward };
            let mut once = bug(start, speed, direction);
            let mut many = once.clone();

            once.update(total);
            let dt = total / splits as f32;
            for _ in 0..splits {
                many.update(dt);
            }

            prop_assert!(torus_distance(once.x, many.x, once.bounds.span()) < 0.5);
        }

        #[test]
        fn prop_stays_in_bounds(
            start in -5000.0f32..5000.0,
            speed in 0.0f32..2000.0,
            forward in any::<bool>(),
            dt in 0.0f32..5.0,
        ) {
            let direction = if forward { Direction::Forward } else { Direction::Backward };
            let mut obstacle = bug(start, speed, direction);
            for _ in 0..10 {
                obstacle.update(dt);
                prop_assert!(obstacle.x >= obstacle.bounds.min);
                prop_assert!(obstacle.x <= obstacle.bounds.max);
            }
        }
    }
}
