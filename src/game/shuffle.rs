//! Piece shuffling
//!
//! A uniform Fisher-Yates permutation over the piece sequence, driven by
//! the game's seeded RNG. Never a comparator with random results: sort
//! algorithms require a consistent total order, and feeding them coin
//! flips is undefined behavior in the making.

use rand::Rng;
use rand::seq::SliceRandom;

use super::piece::Piece;

/// Apply a uniformly random permutation to `pieces` in place.
///
/// Independent of origin indices; the identity permutation is not
/// specially avoided (for any real grid size the odds are negligible).
pub fn shuffle<R: Rng + ?Sized>(pieces: &mut [Piece], rng: &mut R) {
    pieces.shuffle(rng);
}
