//! Rectangular LED panels built from a serpentine-wired strip.
//!
//! Draw into a [`Frame2d`] in `(x, y)` space, then flatten it to strip order
//! with [`convert_frame`] and a table from [`LedLayout::xy_to_index`].
//!
//! ```rust
//! use colaruco::led2d::{Frame2d, LedLayout, convert_frame};
//! use colaruco::led_strip::colors;
//!
//! const LAYOUT: LedLayout<6, 3, 2> = LedLayout::serpentine_row_major();
//! const MAPPING_BY_XY: [u16; 6] = LAYOUT.xy_to_index();
//!
//! let mut frame = Frame2d::<3, 2>::new();
//! frame[(0, 1)] = colors::RED; // bottom-left cell
//! let strip_frame = convert_frame(&frame, &MAPPING_BY_XY);
//! assert_eq!(strip_frame[5], colors::RED); // last LED on the strip
//! ```

pub mod layout;

pub use layout::LedLayout;

use core::ops::{Deref, DerefMut, Index, IndexMut};

use crate::led_strip::{Frame1d, Rgb};

/// 2D pixel buffer, row-major: `frame[(x, y)]` is the pixel at column `x`, row `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame2d<const W: usize, const H: usize>(pub [[Rgb; W]; H]);

impl<const W: usize, const H: usize> Frame2d<W, H> {
    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([[Rgb::new(0, 0, 0); W]; H])
    }
}

impl<const W: usize, const H: usize> Deref for Frame2d<W, H> {
    type Target = [[Rgb; W]; H];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const W: usize, const H: usize> DerefMut for Frame2d<W, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const W: usize, const H: usize> Index<(usize, usize)> for Frame2d<W, H> {
    type Output = Rgb;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> IndexMut<(usize, usize)> for Frame2d<W, H> {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < W, "x_index must be within width");
        assert!(y_index < H, "y_index must be within height");
        &mut self.0[y_index][x_index]
    }
}

impl<const W: usize, const H: usize> Default for Frame2d<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a 2D frame to strip order.
///
/// `mapping_by_xy[y * W + x]` is the LED index wired to `(x, y)`, as produced
/// by [`LedLayout::xy_to_index`]. Every LED is written exactly once.
#[must_use]
pub fn convert_frame<const N: usize, const W: usize, const H: usize>(
    frame_2d: &Frame2d<W, H>,
    mapping_by_xy: &[u16; N],
) -> Frame1d<N> {
    assert_eq!(W.checked_mul(H), Some(N), "width * height must equal N");
    let mut frame_1d = Frame1d::new();
    for (cell, (&led_index, &color)) in mapping_by_xy
        .iter()
        .zip(frame_2d.iter().flatten())
        .enumerate()
    {
        let pixel = frame_1d
            .get_mut(usize::from(led_index))
            .unwrap_or_else(|| panic!("mapping entry {cell} points past the strip"));
        *pixel = color;
    }
    frame_1d
}
