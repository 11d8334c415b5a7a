//! The boundary to NeoPixel-style (WS2812) LED strips.
//!
//! A strip is written one whole [`Frame1d`] at a time through
//! [`LedStripDriver::write_frame`]. Brightness is applied to the frame before
//! it is written, using a precomputed lookup table (see [`brightness_table`]).
//!
//! # Example
//!
//! ```rust
//! use colaruco::led_strip::{Frame1d, apply_brightness, colors};
//!
//! let mut frame = Frame1d::<4>::filled(colors::WHITE);
//! apply_brightness(&mut frame, 128);
//! assert_eq!(frame[0].r, 128);
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
///
/// Common colors include `RED`, `GREEN`, `BLUE`, `YELLOW`, `WHITE`, `BLACK`.
#[doc(inline)]
pub use smart_leds::colors;

use core::ops::{Deref, DerefMut};
use smart_leds::RGB8;

use crate::Result;

#[cfg(not(feature = "host"))]
mod ws2812;
#[cfg(not(feature = "host"))]
pub use ws2812::Ws2812Strip;

/// RGB color representation re-exported from the `smart_leds` crate.
pub type Rgb = RGB8;

/// Unpack a `0xRRGGBB` value into an [`Rgb`]. Bits above 24 are ignored.
#[must_use]
pub const fn rgb_from_u32(value: u32) -> Rgb {
    let [_, red, green, blue] = value.to_be_bytes();
    Rgb::new(red, green, blue)
}

/// Pack an [`Rgb`] into a `0xRRGGBB` value.
#[must_use]
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    u32::from_be_bytes([0, color.r, color.g, color.b])
}

/// [`Rgb`] pixel data for an LED strip, indexed in wiring order.
///
/// Frames deref to `[Rgb; N]`, so you can mutate pixels directly before
/// passing them to [`LedStripDriver::write_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame1d<const N: usize>(pub [Rgb; N]);

impl<const N: usize> Frame1d<N> {
    /// Number of LEDs in this frame.
    pub const LEN: usize = N;

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([Rgb::new(0, 0, 0); N])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: Rgb) -> Self {
        Self([color; N])
    }
}

impl<const N: usize> Deref for Frame1d<N> {
    type Target = [Rgb; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for Frame1d<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[Rgb; N]> for Frame1d<N> {
    fn from(array: [Rgb; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> Default for Frame1d<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the lookup table that scales an 8-bit channel by `brightness`.
///
/// `table[value] == value * brightness / 255`, so a brightness of 255 is the
/// identity and 0 turns every channel off.
#[must_use]
pub const fn brightness_table(brightness: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut index = 0;
    while index < 256 {
        // Both factors are at most 255, so the product fits in u16 and the
        // quotient fits in u8.
        let scaled = (index as u16 * brightness as u16) / 255;
        table[index] = scaled as u8;
        index += 1;
    }
    table
}

/// Scale every channel of `frame` by `brightness` (0 = off, 255 = full).
pub fn apply_brightness<const N: usize>(frame: &mut Frame1d<N>, brightness: u8) {
    let table = brightness_table(brightness);
    let scale = |channel: u8| table.get(usize::from(channel)).copied().unwrap_or(channel);
    for color in frame.iter_mut() {
        *color = Rgb::new(scale(color.r), scale(color.g), scale(color.b));
    }
}

/// A strip of `N` LEDs that accepts whole frames.
///
/// One call is one commit: implementations push every pixel of the frame and
/// latch it before returning.
pub trait LedStripDriver<const N: usize> {
    /// Display `frame` until the next call replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    async fn write_frame(&mut self, frame: &Frame1d<N>) -> Result<()>;
}
