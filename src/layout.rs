//! Grid geometry for the render and animation sinks
//!
//! The engine never draws; it hands the view layer enough geometry to
//! place each tile and to slide two tiles past each other during a swap.
//! Cell side follows the panel formula
//! `(panel - 2*padding - margin*(n-1)) / n`.

use glam::Vec2;

use crate::game::SwapInFlight;

/// Pixel geometry of an N×N tile grid inside a square panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Side of the square game panel, in pixels
    pub panel: u32,
    /// Padding between the panel edge and the outer tiles
    pub padding: u32,
    /// Spacing between adjacent tiles
    pub margin: u32,
    /// Tiles per row/column
    pub grid_size: u32,
}

impl GridLayout {
    pub fn new(panel: u32, padding: u32, margin: u32, grid_size: u32) -> Self {
        Self {
            panel,
            padding,
            margin,
            grid_size,
        }
    }

    /// Side of one tile cell, in pixels
    pub fn cell_side(&self) -> u32 {
        if self.grid_size == 0 {
            return 0;
        }
        let consumed = 2 * self.padding + self.margin * (self.grid_size - 1);
        self.panel.saturating_sub(consumed) / self.grid_size
    }

    /// Top-left pixel origin of the tile at `position` (row-major)
    pub fn origin_of(&self, position: usize) -> Vec2 {
        let stride = (self.cell_side() + self.margin) as f32;
        let row = (position as u32 / self.grid_size.max(1)) as f32;
        let col = (position as u32 % self.grid_size.max(1)) as f32;
        Vec2::new(
            self.padding as f32 + col * stride,
            self.padding as f32 + row * stride,
        )
    }

    /// Translation each tile of an in-flight swap must travel: first
    /// toward second's slot and vice versa. The two deltas cancel.
    pub fn swap_deltas(&self, swap: SwapInFlight) -> (Vec2, Vec2) {
        let from = self.origin_of(swap.first);
        let to = self.origin_of(swap.second);
        (to - from, from - to)
    }

    /// Map a pixel point to the board position under it, if any.
    ///
    /// Points on margins, padding or outside the panel map to `None`.
    pub fn position_at(&self, point: Vec2) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = self.cell_side();
        if cell == 0 {
            return None;
        }
        let stride = (cell + self.margin) as f32;
        let local_x = point.x - self.padding as f32;
        let local_y = point.y - self.padding as f32;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }
        let col = (local_x / stride) as u32;
        let row = (local_y / stride) as u32;
        if col >= self.grid_size || row >= self.grid_size {
            return None;
        }
        // Reject points that fall on the margin past a cell's edge
        if local_x - col as f32 * stride >= cell as f32 || local_y - row as f32 * stride >= cell as f32 {
            return None;
        }
        Some((row * self.grid_size + col) as usize)
    }
}
