//! A [`Medium`] on NOR flash that rotates its image over a ring of erase sectors.
//!
//! Programming flash can only clear bits; setting one needs an erase of the
//! whole sector. The medium keeps its image in RAM, takes writes there, and
//! [`Medium::flush`] commits them:
//!
//! - if every changed byte only clears bits, the changed span is programmed in
//!   place and nothing is erased;
//! - otherwise the next sector of the ring is erased, the image is written to
//!   it, and only then its sequence header, which makes it the current sector.
//!
//! Opening the medium picks the sector with the highest sequence header. A
//! sector whose commit was cut short has no header and is skipped, so power
//! loss during a commit leaves the previous image current. Erases are spread
//! over [`SECTOR_COUNT`] sectors.
//!
//! On the Pico 1 the ring sits in the last 16 KiB of flash
//! ([`FlashMedium::at_end`]); `memory-pico1.x` keeps the firmware out of it.

use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};

use super::medium::{Medium, byte_range};
use crate::fmt::log_info;
use crate::{Error, Result};

/// Bytes per sector of the ring.
pub const SECTOR_SIZE: usize = 4096;
/// Sectors the image rotates over.
pub const SECTOR_COUNT: usize = 4;
/// Bytes the medium exposes: one sector minus its sequence header.
pub const IMAGE_SIZE: usize = SECTOR_SIZE - HEADER_SIZE;

const HEADER_SIZE: usize = 4;
/// Header value of a sector that holds no committed image.
const ERASED_SEQUENCE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Commit {
    sector: usize,
    sequence: u32,
}

/// A [`Medium`] of [`IMAGE_SIZE`] bytes kept in [`SECTOR_COUNT`] flash sectors.
pub struct FlashMedium<F> {
    flash: F,
    base: u32,
    current: Option<Commit>,
    image: [u8; IMAGE_SIZE],
    committed: [u8; IMAGE_SIZE],
}

impl<F: NorFlash> FlashMedium<F> {
    /// Open the ring of sectors starting at flash offset `base`.
    ///
    /// A flash with no committed sector reads as erased (`0xFF`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the ring is misaligned or does not
    /// fit the flash, or the flash's read error.
    pub fn new(mut flash: F, base: u32) -> Result<Self> {
        let start = usize::try_from(base).map_err(|_| Error::IndexOutOfBounds)?;
        let fits = start
            .checked_add(SECTOR_COUNT * SECTOR_SIZE)
            .is_some_and(|end| end <= flash.capacity());
        let aligned = start % SECTOR_SIZE == 0
            && SECTOR_SIZE % F::ERASE_SIZE == 0
            && HEADER_SIZE % F::WRITE_SIZE == 0;
        if !fits || !aligned {
            return Err(Error::IndexOutOfBounds);
        }

        let mut current: Option<Commit> = None;
        for sector in 0..SECTOR_COUNT {
            let mut header = [0u8; HEADER_SIZE];
            flash
                .read(sector_offset(base, sector), &mut header)
                .map_err(flash_error)?;
            let sequence = u32::from_le_bytes(header);
            if sequence != ERASED_SEQUENCE
                && current.is_none_or(|newest| sequence > newest.sequence)
            {
                current = Some(Commit { sector, sequence });
            }
        }

        let mut image = [0xFF; IMAGE_SIZE];
        if let Some(commit) = current {
            flash
                .read(image_offset(base, commit.sector), &mut image)
                .map_err(flash_error)?;
            log_info!(
                "Flash: image in sector {} (sequence {})",
                commit.sector,
                commit.sequence
            );
        } else {
            log_info!("Flash: no committed image");
        }

        Ok(Self {
            flash,
            base,
            current,
            image,
            committed: image,
        })
    }

    /// Open the ring in the last [`SECTOR_COUNT`] sectors of `flash`, away from the firmware.
    ///
    /// # Errors
    ///
    /// See [`FlashMedium::new`].
    pub fn at_end(flash: F) -> Result<Self> {
        let base = flash
            .capacity()
            .checked_sub(SECTOR_COUNT * SECTOR_SIZE)
            .and_then(|base| u32::try_from(base).ok())
            .ok_or(Error::IndexOutOfBounds)?;
        Self::new(flash, base)
    }

    /// The flash driver.
    #[must_use]
    pub const fn flash(&self) -> &F {
        &self.flash
    }

    /// Give back the flash driver. Uncommitted writes are dropped.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn commit(&mut self) -> Result<()> {
        let changed = |(new, old): (&u8, &u8)| new != old;
        let Some(first) = self.image.iter().zip(&self.committed).position(changed) else {
            return Ok(());
        };
        let last = self
            .image
            .iter()
            .zip(&self.committed)
            .rposition(changed)
            .unwrap_or(first);
        let clears_only = self
            .image
            .iter()
            .zip(&self.committed)
            .all(|(new, old)| new & old == *new);

        match self.current {
            Some(commit) if clears_only => self.program_in_place(commit, first, last)?,
            _ => self.rotate()?,
        }
        self.committed = self.image;
        Ok(())
    }

    /// Program image bytes `first..=last` over the current sector.
    fn program_in_place(&mut self, commit: Commit, first: usize, last: usize) -> Result<()> {
        let start = first - first % F::WRITE_SIZE;
        let end = (last + 1).next_multiple_of(F::WRITE_SIZE).min(IMAGE_SIZE);
        let span = self.image.get(start..end).ok_or(Error::IndexOutOfBounds)?;
        let offset = image_offset(self.base, commit.sector) + span_offset(start)?;
        self.flash.write(offset, span).map_err(flash_error)
    }

    /// Commit the image to the next sector of the ring; its header goes last.
    fn rotate(&mut self) -> Result<()> {
        let next = self.current.map_or(
            Commit {
                sector: 0,
                sequence: 0,
            },
            |commit| Commit {
                sector: (commit.sector + 1) % SECTOR_COUNT,
                sequence: commit.sequence.wrapping_add(1),
            },
        );
        let start = sector_offset(self.base, next.sector);
        self.flash
            .erase(start, start + span_offset(SECTOR_SIZE)?)
            .map_err(flash_error)?;
        self.flash
            .write(image_offset(self.base, next.sector), &self.image)
            .map_err(flash_error)?;
        self.flash
            .write(start, &next.sequence.to_le_bytes())
            .map_err(flash_error)?;
        log_info!(
            "Flash: committed to sector {} (sequence {})",
            next.sector,
            next.sequence
        );
        self.current = Some(next);
        Ok(())
    }
}

impl<F: NorFlash> Medium for FlashMedium<F> {
    fn capacity(&self) -> usize {
        IMAGE_SIZE
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<()> {
        buffer.copy_from_slice(byte_range(&self.image, offset, buffer.len())?);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset
            .checked_add(data.len())
            .ok_or(Error::IndexOutOfBounds)?;
        self.image
            .get_mut(offset..end)
            .ok_or(Error::IndexOutOfBounds)?
            .copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.commit()
    }
}

const fn sector_offset(base: u32, sector: usize) -> u32 {
    base + (sector * SECTOR_SIZE) as u32
}

const fn image_offset(base: u32, sector: usize) -> u32 {
    sector_offset(base, sector) + HEADER_SIZE as u32
}

fn span_offset(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::IndexOutOfBounds)
}

fn flash_error<E: NorFlashError>(err: E) -> Error {
    match err.kind() {
        NorFlashErrorKind::OutOfBounds => Error::IndexOutOfBounds,
        _ => Error::Flash,
    }
}
