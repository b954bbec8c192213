//! Deterministic puzzle core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Board, timer and phase mutations happen on one control thread
//! - No rendering or platform dependencies

pub mod board;
pub mod controller;
pub mod piece;
pub mod shuffle;
pub mod timer;

pub use board::{PuzzleBoard, SelectionResult};
pub use controller::{Game, GameEvent, Phase, SwapInFlight};
pub use piece::{Piece, slice};
pub use shuffle::shuffle;
pub use timer::{LevelTimer, Tick, TimerEpoch, TimerState, time_for_level};

/// Errors raised by the puzzle core.
///
/// Every variant is a rejected invalid call: no state is mutated and the
/// caller may retry with corrected input. There is no fatal class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("grid size must be at least 1")]
    InvalidGridSize,
    #[error("source image has zero width or height")]
    EmptyImage,
    #[error("grid size {grid_size} is finer than the {min_dim}px source image")]
    GridTooFine { grid_size: u32, min_dim: u32 },
    #[error("position {position} out of range for a {slots}-slot board")]
    PositionOutOfRange { position: usize, slots: usize },
    #[error("piece origins do not form a permutation of 0..{slots}")]
    NotAPermutation { slots: usize },
}
