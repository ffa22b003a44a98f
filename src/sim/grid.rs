//! Grid geometry: row/column cells to canvas pixels
//!
//! Row 0 is the start row at the bottom of the canvas; rows count upward.

use glam::Vec2;

use crate::config::ValidConfig;

/// Fixed grid geometry derived from the configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub num_rows: usize,
    pub num_cols: usize,
    pub cell_width: f32,
    pub row_height: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub bottom_offset: f32,
    pub goal_row: usize,
}

impl Grid {
    pub fn new(config: &ValidConfig) -> Self {
        Self {
            num_rows: config.num_rows,
            num_cols: config.num_cols,
            cell_width: config.cell_width,
            row_height: config.row_height,
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            bottom_offset: config.bottom_offset,
            goal_row: config.goal_row(),
        }
    }

    /// Sprite origin (top-left) for a grid cell
    #[inline]
    pub fn to_pixel(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(self.col_x(col as f32), self.row_y(row))
    }

    /// X of a (possibly fractional or negative) column
    #[inline]
    pub fn col_x(&self, col: f32) -> f32 {
        col * self.cell_width
    }

    /// Sprite Y for a row
    #[inline]
    pub fn row_y(&self, row: usize) -> f32 {
        self.canvas_height - self.bottom_offset - self.row_height * row as f32
    }

    /// True for rows an obstacle lane can occupy
    pub fn is_lane(&self, row: usize) -> bool {
        row > 0 && row < self.goal_row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_default_grid() {
        let grid = Grid::new(&ValidConfig::default());

        let start = grid.to_pixel(0, 2);
        assert_eq!(start.x, 202.0);
        assert!((start.y - (606.0 - 228.25)).abs() < 1e-4);

        // Each row up moves one row height toward the top of the canvas
        let lane = grid.to_pixel(1, 0);
        assert!((start.y - lane.y - 83.0).abs() < 1e-4);
        assert_eq!(lane.x, 0.0);
    }

    #[test]
    fn test_lanes_exclude_start_and_goal() {
        let grid = Grid::new(&ValidConfig::default());
        assert!(!grid.is_lane(0));
        assert!(grid.is_lane(1));
        assert!(grid.is_lane(3));
        assert!(!grid.is_lane(grid.goal_row));
    }
}
