//! Puzzle board state
//!
//! The live mapping of screen position to piece, the two-tap selection
//! protocol, and solved detection.
//!
//! Positions are row-major:
//! ```none
//! +---+---+---+
//! | 0 | 1 | 2 |
//! +---+---+---+
//! | 3 | 4 | 5 |
//! +---+---+---+
//! | 6 | 7 | 8 |
//! +---+---+---+
//! ```
//! The puzzle is solved when every slot holds the piece whose origin
//! index equals the slot position.

use super::PuzzleError;
use super::piece::Piece;

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionResult {
    /// First tile armed for exchange
    Armed(usize),
    /// Armed selection cleared (same tile tapped twice)
    Cleared,
    /// Two distinct tiles selected; their pieces have been exchanged
    Exchanged { first: usize, second: usize },
}

/// Board state for one level.
///
/// Invariant: `slots[p].origin_index()` is a permutation of `0..slots.len()`
/// at all times - exchanges swap piece references, never duplicate them.
/// `misplaced` counts slots whose piece is not at its origin and is kept in
/// lockstep with every exchange, so `is_solved` is O(1).
#[derive(Debug, Clone)]
pub struct PuzzleBoard {
    slots: Vec<Piece>,
    first_selected: Option<usize>,
    misplaced: usize,
}

impl PuzzleBoard {
    /// Build a board from a (typically shuffled) piece sequence.
    ///
    /// Rejects piece sets whose origin indices do not form a permutation
    /// of `0..len` - a duplicated or missing piece would make the solved
    /// condition unreachable.
    pub fn new(pieces: Vec<Piece>) -> Result<Self, PuzzleError> {
        let slots = pieces.len();
        let mut seen = vec![false; slots];
        for piece in &pieces {
            let origin = piece.origin_index();
            if origin >= slots || seen[origin] {
                return Err(PuzzleError::NotAPermutation { slots });
            }
            seen[origin] = true;
        }
        let misplaced = pieces
            .iter()
            .enumerate()
            .filter(|(p, piece)| piece.origin_index() != *p)
            .count();
        Ok(Self {
            slots: pieces,
            first_selected: None,
            misplaced,
        })
    }

    /// Number of board positions
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The position currently armed for exchange, if any
    #[inline]
    pub fn first_selected(&self) -> Option<usize> {
        self.first_selected
    }

    /// The piece currently occupying `position`
    pub fn piece_at(&self, position: usize) -> Result<&Piece, PuzzleError> {
        self.check_position(position)?;
        Ok(&self.slots[position])
    }

    /// Iterate `(position, piece)` pairs for the render sink
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.slots.iter().enumerate()
    }

    /// Handle a tap on `position`.
    ///
    /// - Tapping the armed tile again disarms it (`Cleared`).
    /// - Tapping with nothing armed arms the tile (`Armed`).
    /// - Tapping a second, distinct tile exchanges the two pieces and
    ///   disarms (`Exchanged`).
    ///
    /// Out-of-range positions are rejected with no state change.
    pub fn select(&mut self, position: usize) -> Result<SelectionResult, PuzzleError> {
        self.check_position(position)?;
        match self.first_selected {
            Some(first) if first == position => {
                self.first_selected = None;
                Ok(SelectionResult::Cleared)
            }
            None => {
                self.first_selected = Some(position);
                Ok(SelectionResult::Armed(position))
            }
            Some(first) => {
                self.exchange(first, position);
                self.first_selected = None;
                Ok(SelectionResult::Exchanged {
                    first,
                    second: position,
                })
            }
        }
    }

    /// True iff every slot holds the piece originating there.
    ///
    /// Backed by the misplaced-count cache; equals the full scan exactly.
    #[inline]
    pub fn is_solved(&self) -> bool {
        debug_assert_eq!(self.misplaced == 0, self.scan_solved());
        self.misplaced == 0
    }

    /// Full O(N²) solved scan, the reference semantics for `is_solved`
    fn scan_solved(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(p, piece)| piece.origin_index() == p)
    }

    fn exchange(&mut self, a: usize, b: usize) {
        let matched_before = self.matches_at(a) + self.matches_at(b);
        self.slots.swap(a, b);
        let matched_after = self.matches_at(a) + self.matches_at(b);
        self.misplaced = self.misplaced + matched_before - matched_after;
    }

    fn matches_at(&self, position: usize) -> usize {
        usize::from(self.slots[position].origin_index() == position)
    }

    fn check_position(&self, position: usize) -> Result<(), PuzzleError> {
        if position >= self.slots.len() {
            return Err(PuzzleError::PositionOutOfRange {
                position,
                slots: self.slots.len(),
            });
        }
        Ok(())
    }
}
