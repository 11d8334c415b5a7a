//! Wear-leveled persistence of the [`DisplayConfig`].
//!
//! The medium is treated as an array of fixed-size record slots followed, at
//! its very last byte, by a one-byte slot index. Every save writes the record
//! into the slot after the current one and then advances the index, so on a
//! byte-writable medium repeated saves rotate over all [`SLOT_COUNT`] slots
//! instead of rewriting one location.
//!
//! Record layout (little-endian color):
//!
//! | bytes  | field        |
//! |--------|--------------|
//! | 0      | code size    |
//! | 1..=7  | code rows    |
//! | 8      | brightness   |
//! | 9..=12 | color (u32)  |
//!
//! A save that loses power between the record write and the index write
//! leaves the previous slot current; the half-written record is never read.
//! Each save ends with [`Medium::flush`]; on [`FlashMedium`] that is the one
//! commit that reaches flash, and its sector rotation does the wear leveling.
//!
//! ```rust
//! use colaruco::led_strip::colors;
//! use colaruco::settings::{DisplayConfig, RamMedium, SettingsStore};
//!
//! let mut store = SettingsStore::new(RamMedium::<2048>::erased())?;
//! assert_eq!(store.load()?, None); // nothing saved yet
//!
//! let config = DisplayConfig {
//!     color: colors::RED,
//!     brightness: 200,
//!     ..DisplayConfig::default()
//! };
//! store.save(&config)?;
//! assert_eq!(store.load()?, Some(config));
//! # Ok::<(), colaruco::Error>(())
//! ```

pub mod flash_medium;
pub mod medium;

pub use flash_medium::FlashMedium;
pub use medium::{Medium, RamMedium};

use crate::fmt::{log_info, log_warn};
use crate::led_strip::{Rgb, colors, rgb_from_u32, rgb_to_u32};
use crate::marker::{CODE_BYTES, LogicalCode};
use crate::{Error, Result};

/// Bytes per persisted record.
pub const RECORD_SIZE: usize = 1 + CODE_BYTES + 1 + 4;
/// Highest valid slot index; the next save after it wraps to 0.
pub const SLOT_LIMIT: u8 = 102;
/// Number of record slots.
pub const SLOT_COUNT: usize = SLOT_LIMIT as usize + 1;
/// Smallest medium that holds every slot plus the trailing slot index.
pub const REQUIRED_CAPACITY: usize = SLOT_COUNT * RECORD_SIZE + 1;

const SIZE_OFFSET: usize = 0;
const CODE_OFFSET: usize = SIZE_OFFSET + 1;
const BRIGHTNESS_OFFSET: usize = CODE_OFFSET + CODE_BYTES;
const COLOR_OFFSET: usize = BRIGHTNESS_OFFSET + 1;
const _: () = assert!(COLOR_OFFSET + 4 == RECORD_SIZE);

/// Everything the marker display shows: the code, its color and brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Color of set cells.
    pub color: Rgb,
    /// Global brightness, 0 (off) to 255 (full).
    pub brightness: u8,
    /// The marker pattern.
    pub code: LogicalCode,
}

impl DisplayConfig {
    /// Encode as one persisted record.
    #[must_use]
    pub fn to_record(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        let (head, color) = record.split_at_mut(COLOR_OFFSET);
        let (size, rest) = head.split_at_mut(CODE_OFFSET);
        let (code, brightness) = rest.split_at_mut(CODE_BYTES);
        size.fill(self.code.size());
        code.copy_from_slice(self.code.raw_rows());
        brightness.fill(self.brightness);
        color.copy_from_slice(&rgb_to_u32(self.color).to_le_bytes());
        record
    }

    /// Decode a persisted record exactly as stored.
    #[must_use]
    pub fn from_record(record: &[u8; RECORD_SIZE]) -> Self {
        let (head, color) = record.split_at(COLOR_OFFSET);
        let (size, rest) = head.split_at(CODE_OFFSET);
        let (code, brightness) = rest.split_at(CODE_BYTES);

        let mut rows = [0u8; CODE_BYTES];
        rows.copy_from_slice(code);
        let mut color_bytes = [0u8; 4];
        color_bytes.copy_from_slice(color);

        Self {
            color: rgb_from_u32(u32::from_le_bytes(color_bytes)),
            brightness: brightness.first().copied().unwrap_or(0),
            code: LogicalCode::from_raw(size.first().copied().unwrap_or(0), rows),
        }
    }
}

impl Default for DisplayConfig {
    /// All zero, the state a fresh board starts in: black, dark, empty code.
    fn default() -> Self {
        Self {
            color: colors::BLACK,
            brightness: 0,
            code: LogicalCode::EMPTY,
        }
    }
}

/// Rotating-slot store for one [`DisplayConfig`] on a byte [`Medium`].
pub struct SettingsStore<M> {
    medium: M,
    index_offset: usize,
}

impl<M: Medium> SettingsStore<M> {
    /// Wrap `medium`; the slot index lives at its last byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MediumTooSmall`] if the medium is smaller than [`REQUIRED_CAPACITY`].
    pub fn new(medium: M) -> Result<Self> {
        let capacity = medium.capacity();
        if capacity < REQUIRED_CAPACITY {
            return Err(Error::MediumTooSmall {
                capacity,
                required: REQUIRED_CAPACITY,
            });
        }
        Ok(Self {
            medium,
            index_offset: capacity - 1,
        })
    }

    /// The raw slot index byte. Values above [`SLOT_LIMIT`] mean nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns the medium's read error.
    pub fn slot_index(&mut self) -> Result<u8> {
        let mut buffer = [0u8; 1];
        self.medium.read(self.index_offset, &mut buffer)?;
        let [slot] = buffer;
        Ok(slot)
    }

    /// Persist `config` in the next slot and return that slot.
    ///
    /// # Errors
    ///
    /// Returns the medium's read, write or flush error.
    pub fn save(&mut self, config: &DisplayConfig) -> Result<u8> {
        let slot = next_slot(self.slot_index()?);
        self.medium
            .write(record_offset(slot), &config.to_record())?;
        self.medium.write(self.index_offset, &[slot])?;
        self.medium.flush()?;
        log_info!("Settings: saved to slot {}", slot);
        Ok(slot)
    }

    /// Read the most recently saved config, or `None` if nothing has been saved.
    ///
    /// A slot that was never written decodes as whatever the medium holds there.
    ///
    /// # Errors
    ///
    /// Returns the medium's read error.
    pub fn load(&mut self) -> Result<Option<DisplayConfig>> {
        let slot = self.slot_index()?;
        if slot > SLOT_LIMIT {
            log_warn!("Settings: no saved settings (slot index {})", slot);
            return Ok(None);
        }
        let mut record = [0u8; RECORD_SIZE];
        self.medium.read(record_offset(slot), &mut record)?;
        log_info!("Settings: loaded slot {}", slot);
        Ok(Some(DisplayConfig::from_record(&record)))
    }

    /// The wrapped medium.
    #[must_use]
    pub const fn medium(&self) -> &M {
        &self.medium
    }

    /// Unwrap the store, returning the medium.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.medium
    }
}

/// Advance-then-wrap: any index at or past [`SLOT_LIMIT`] (including an erased 0xFF) goes to 0.
const fn next_slot(slot: u8) -> u8 {
    if slot >= SLOT_LIMIT { 0 } else { slot + 1 }
}

const fn record_offset(slot: u8) -> usize {
    slot as usize * RECORD_SIZE
}
