//! Tile Swap - an image swap-puzzle engine
//!
//! Core modules:
//! - `game`: Deterministic puzzle core (slicing, shuffling, board, timer, controller)
//! - `layout`: Grid geometry for the render and animation sinks
//! - `settings`: Player preferences
//! - `records`: Best-result table

pub mod game;
pub mod layout;
pub mod records;
pub mod settings;

pub use records::Records;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid size of the first level
    pub const BASE_GRID_SIZE: u32 = 3;
    /// Smallest grid size a restart can fall back to
    pub const MIN_GRID_SIZE: u32 = 3;

    /// Default spacing between adjacent tiles, in pixels
    pub const DEFAULT_TILE_MARGIN: u32 = 3;
    /// Default padding between the panel edge and the outer tiles, in pixels
    pub const DEFAULT_PANEL_PADDING: u32 = 0;

    /// Duration of the tile swap animation, in milliseconds
    pub const SWAP_DURATION_MS: u64 = 300;
}
