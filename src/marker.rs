//! Marker rendering: border padding and serpentine placement on the matrix.
//!
//! A [`LogicalCode`] is a square bit pattern, one row bitmask per row, with
//! bit `size - 1` as the leftmost cell. [`add_border`] pads it with a two-cell
//! frame on every side, and [`render_marker`] places the result in the
//! top-left corner of the 10×10 serpentine-wired matrix.
//!
//! ```rust
//! use colaruco::led_strip::colors;
//! use colaruco::marker::{BorderRow, LogicalCode, OffColor, add_border, render_marker};
//!
//! let code = LogicalCode::new(&[0b10, 0b01])?;
//! let grid = add_border(&code, BorderRow::AsShipped)?;
//! assert_eq!(grid.rows(), &[64, 33, 41, 37, 33, 64]);
//!
//! let frame = render_marker(&code, colors::RED, BorderRow::AsShipped, OffColor::Black)?;
//! assert_eq!(frame[0], colors::BLACK);
//! assert_eq!(frame[19], colors::RED); // row 1 runs right-to-left, so LED 19 is its left end
//! # Ok::<(), colaruco::Error>(())
//! ```

use crate::led2d::{Frame2d, LedLayout, convert_frame};
use crate::led_strip::{Frame1d, Rgb, colors, rgb_from_u32, rgb_to_u32};
use crate::{Error, Result};

/// LEDs per matrix row.
pub const MATRIX_WIDTH: usize = 10;
/// Rows in the matrix.
pub const MATRIX_HEIGHT: usize = 10;
/// Total LEDs on the strip.
pub const LED_COUNT: usize = MATRIX_WIDTH * MATRIX_HEIGHT;
/// Cells added to the side length by [`add_border`].
pub const BORDER_PADDING: u8 = 4;
/// Largest code side length that still fits the matrix once bordered.
pub const MAX_CODE_SIZE: u8 = 6;
/// Code rows a settings record reserves.
pub const CODE_BYTES: usize = 7;

const MAX_GRID_SIZE: usize = MAX_CODE_SIZE as usize + BORDER_PADDING as usize;
const _: () = assert!(MAX_GRID_SIZE <= MATRIX_WIDTH && MAX_GRID_SIZE <= MATRIX_HEIGHT);
const _: () = assert!(MAX_CODE_SIZE as usize <= CODE_BYTES);

/// Wiring of the marker matrix: row 0 left-to-right, row 1 right-to-left, and so on.
pub const PANEL_LAYOUT: LedLayout<LED_COUNT, MATRIX_WIDTH, MATRIX_HEIGHT> =
    LedLayout::serpentine_row_major();
const MAPPING_BY_XY: [u16; LED_COUNT] = PANEL_LAYOUT.xy_to_index();

/// A matrix-sized frame in `(x, y)` space.
pub type PanelFrame = Frame2d<MATRIX_WIDTH, MATRIX_HEIGHT>;
/// A matrix-sized frame in strip order.
pub type StripFrame = Frame1d<LED_COUNT>;

/// The marker pattern before bordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalCode {
    size: u8,
    rows: [u8; CODE_BYTES],
}

impl LogicalCode {
    /// A code of size 0. It renders as a bare 4×4 border.
    pub const EMPTY: Self = Self {
        size: 0,
        rows: [0; CODE_BYTES],
    };

    /// Build a code from its rows; the size is the number of rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodeTooLarge`] if more than [`MAX_CODE_SIZE`] rows are given.
    pub fn new(rows: &[u8]) -> Result<Self> {
        let size = u8::try_from(rows.len())
            .ok()
            .filter(|size| *size <= MAX_CODE_SIZE)
            .ok_or(Error::CodeTooLarge {
                size: u8::try_from(rows.len()).unwrap_or(u8::MAX),
            })?;
        let mut code = Self::EMPTY;
        code.size = size;
        for (slot, row) in code.rows.iter_mut().zip(rows) {
            *slot = *row;
        }
        Ok(code)
    }

    /// Rebuild a code exactly as stored, without validating `size`.
    ///
    /// Rendering rejects an out-of-range size later with [`Error::CodeTooLarge`].
    #[must_use]
    pub const fn from_raw(size: u8, rows: [u8; CODE_BYTES]) -> Self {
        Self { size, rows }
    }

    /// Side length of the code.
    #[must_use]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Every stored row byte, including unused trailing rows.
    #[must_use]
    pub const fn raw_rows(&self) -> &[u8; CODE_BYTES] {
        &self.rows
    }

    /// The first `size` rows (all stored rows if `size` is out of range).
    #[must_use]
    pub fn rows(&self) -> &[u8] {
        self.rows
            .get(..usize::from(self.size))
            .unwrap_or(&self.rows)
    }
}

/// Value written to the first and last row of a [`BorderedGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BorderRow {
    /// `2^size`: a single bit one position past the row, as the deployed
    /// firmware computes it. Those rows render unlit.
    #[default]
    AsShipped,
    /// `2^size - 1`: every cell of the row set.
    Solid,
}

impl BorderRow {
    const fn value(self, grid_size: u8) -> u16 {
        match self {
            Self::AsShipped => 1 << grid_size,
            Self::Solid => (1 << grid_size) - 1,
        }
    }
}

/// A [`LogicalCode`] padded with its two-ring border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderedGrid {
    size: u8,
    rows: [u16; MAX_GRID_SIZE],
}

impl BorderedGrid {
    /// Side length, `code.size() + 4`.
    #[must_use]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// One bitmask per row; bit `size - 1` is the leftmost cell.
    #[must_use]
    pub fn rows(&self) -> &[u16] {
        self.rows
            .get(..usize::from(self.size))
            .unwrap_or(&self.rows)
    }

    /// Whether the cell at column `x_index`, row `y_index` is lit.
    ///
    /// Columns read most-significant bit first. Cells outside the grid are unlit.
    #[must_use]
    pub fn is_set(&self, x_index: usize, y_index: usize) -> bool {
        let width = usize::from(self.size);
        let Some(bit) = width.checked_sub(1).and_then(|last| last.checked_sub(x_index)) else {
            return false;
        };
        self.rows()
            .get(y_index)
            .is_some_and(|row| row >> bit & 1 == 1)
    }
}

/// Pad `code` with a two-cell border and return the bordered grid.
///
/// For a grid of side `n = size + 4`:
/// - rows `0` and `n - 1` hold the [`BorderRow`] value,
/// - rows `1` and `n - 2` set only the outer columns (`2^(n-1) + 1`),
/// - row `i` in between holds code row `i - 2` shifted left by 2, framed by
///   the outer column bits.
///
/// Row bits above `size` are ignored.
///
/// # Errors
///
/// Returns [`Error::CodeTooLarge`] if the bordered grid would not fit the matrix.
pub fn add_border(code: &LogicalCode, border_row: BorderRow) -> Result<BorderedGrid> {
    let size = code.size();
    if size > MAX_CODE_SIZE {
        return Err(Error::CodeTooLarge { size });
    }
    let grid_size = size + BORDER_PADDING;
    let outer_columns: u16 = (1 << (grid_size - 1)) | 1;
    let code_mask: u16 = (1 << size) - 1;

    let mut rows = [0u16; MAX_GRID_SIZE];
    let last = usize::from(grid_size - 1);
    for (index, row) in rows.iter_mut().take(last + 1).enumerate() {
        *row = if index == 0 || index == last {
            border_row.value(grid_size)
        } else if index == 1 || index == last - 1 {
            outer_columns
        } else {
            let code_row = code.rows().get(index - 2).copied().unwrap_or(0);
            outer_columns | (u16::from(code_row) & code_mask) << 2
        };
    }

    Ok(BorderedGrid {
        size: grid_size,
        rows,
    })
}

/// Color for cells whose bit is clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffColor {
    /// LEDs off.
    #[default]
    Black,
    /// The RGB complement of the marker color, `0xFFFFFF - color`.
    Contrast,
}

impl OffColor {
    /// The off-cell color paired with `on_color`.
    #[must_use]
    pub const fn resolve(self, on_color: Rgb) -> Rgb {
        match self {
            Self::Black => colors::BLACK,
            Self::Contrast => rgb_from_u32(0x00FF_FFFF ^ rgb_to_u32(on_color)),
        }
    }
}

/// LED index wired to bit `bit` of bordered row `row`, for a grid `grid_width` wide.
///
/// Even rows run left-to-right and are read most-significant bit first; odd
/// rows run right-to-left and are shifted by `MATRIX_WIDTH - grid_width` so
/// both share the matrix's left edge.
#[must_use]
pub const fn pixel_index(row: usize, bit: usize, grid_width: usize) -> usize {
    let row_start = row * MATRIX_WIDTH;
    if row % 2 == 1 {
        row_start + bit + (MATRIX_WIDTH - grid_width)
    } else {
        row_start + (grid_width - 1 - bit)
    }
}

/// Draw `grid` into the top-left of an otherwise black matrix frame.
#[must_use]
pub fn render_grid(grid: &BorderedGrid, color: Rgb, off_color: OffColor) -> PanelFrame {
    let off = off_color.resolve(color);
    let grid_size = usize::from(grid.size());
    let mut frame = PanelFrame::new();
    for (y_index, line) in frame.iter_mut().enumerate().take(grid_size) {
        for (x_index, pixel) in line.iter_mut().enumerate().take(grid_size) {
            *pixel = if grid.is_set(x_index, y_index) { color } else { off };
        }
    }
    frame
}

/// Border `code` and lay it out in strip order, ready for one commit.
///
/// LEDs outside the bordered grid are black, so a smaller marker fully
/// replaces a larger one.
///
/// # Errors
///
/// Returns [`Error::CodeTooLarge`] if the code does not fit the matrix.
pub fn render_marker(
    code: &LogicalCode,
    color: Rgb,
    border_row: BorderRow,
    off_color: OffColor,
) -> Result<StripFrame> {
    let grid = add_border(code, border_row)?;
    let panel_frame = render_grid(&grid, color, off_color);
    Ok(convert_frame(&panel_frame, &MAPPING_BY_XY))
}
