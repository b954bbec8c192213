//! Image slicing
//!
//! Partitions a source image into an N×N grid of equally sized pieces,
//! each tagged with the position it belongs at when the puzzle is solved.

use image::{RgbaImage, imageops};

use super::PuzzleError;

/// One cropped tile of the source image.
///
/// Immutable once created; a level transition discards the whole set and
/// slices a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    origin_index: usize,
    image: RgbaImage,
}

impl Piece {
    /// The board position this piece occupies in the solved arrangement
    #[inline]
    pub fn origin_index(&self) -> usize {
        self.origin_index
    }

    /// The cropped tile image
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Side length of the (square) tile, in pixels
    #[inline]
    pub fn side(&self) -> u32 {
        self.image.width()
    }
}

/// Slice `source` into `grid_size * grid_size` square pieces.
///
/// Each piece has side `min(width, height) / grid_size` (truncating) and is
/// cropped at `(col * side, row * side)`. The output is in ascending origin
/// order; shuffling is a separate step. The source image is not mutated.
pub fn slice(source: &RgbaImage, grid_size: u32) -> Result<Vec<Piece>, PuzzleError> {
    if grid_size == 0 {
        return Err(PuzzleError::InvalidGridSize);
    }
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(PuzzleError::EmptyImage);
    }
    let min_dim = width.min(height);
    let side = min_dim / grid_size;
    if side == 0 {
        return Err(PuzzleError::GridTooFine { grid_size, min_dim });
    }

    let mut pieces = Vec::with_capacity((grid_size * grid_size) as usize);
    for row in 0..grid_size {
        for col in 0..grid_size {
            let tile = imageops::crop_imm(source, col * side, row * side, side, side).to_image();
            pieces.push(Piece {
                origin_index: (row * grid_size + col) as usize,
                image: tile,
            });
        }
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    /// Gradient test image: pixel value encodes its coordinates
    fn test_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        })
    }

    #[test]
    fn test_slice_produces_grid_squared_pieces() {
        let source = test_image(90, 90);
        let pieces = slice(&source, 3).unwrap();
        assert_eq!(pieces.len(), 9);
        for (i, piece) in pieces.iter().enumerate() {
            assert_eq!(piece.origin_index(), i);
            assert_eq!(piece.side(), 30);
        }
    }

    #[test]
    fn test_slice_uses_min_dimension() {
        let source = test_image(120, 90);
        let pieces = slice(&source, 3).unwrap();
        assert_eq!(pieces[0].side(), 30);
    }

    #[test]
    fn test_slice_crops_at_grid_origin() {
        let source = test_image(90, 90);
        let pieces = slice(&source, 3).unwrap();
        // Piece at row 2, col 1 starts at (30, 60) in the source
        let piece = &pieces[7];
        assert_eq!(piece.image().get_pixel(0, 0), source.get_pixel(30, 60));
        assert_eq!(piece.image().get_pixel(29, 29), source.get_pixel(59, 89));
    }

    #[test]
    fn test_slice_rejects_zero_grid() {
        let source = test_image(90, 90);
        assert_eq!(slice(&source, 0), Err(PuzzleError::InvalidGridSize));
    }

    #[test]
    fn test_slice_rejects_empty_image() {
        let source = RgbaImage::new(0, 0);
        assert_eq!(slice(&source, 3), Err(PuzzleError::EmptyImage));
    }

    #[test]
    fn test_slice_rejects_grid_finer_than_image() {
        let source = test_image(4, 4);
        assert_eq!(
            slice(&source, 5),
            Err(PuzzleError::GridTooFine {
                grid_size: 5,
                min_dim: 4
            })
        );
    }

    proptest! {
        /// Origin indices form the set [0, N²) exactly once each.
        #[test]
        fn prop_slice_covers_origin_indices(grid in 1u32..=8, extra_w in 0u32..32, extra_h in 0u32..32) {
            let source = test_image(grid * 16 + extra_w, grid * 16 + extra_h);
            let pieces = slice(&source, grid).unwrap();
            let n = (grid * grid) as usize;
            prop_assert_eq!(pieces.len(), n);
            let mut seen = vec![false; n];
            for piece in &pieces {
                prop_assert!(!seen[piece.origin_index()]);
                seen[piece.origin_index()] = true;
            }
        }
    }
}
