//! Byte-addressed persistent media.

use crate::{Error, Result};

/// A fixed-capacity, byte-addressed store that keeps its contents across resets.
pub trait Medium {
    /// Total addressable bytes.
    fn capacity(&self) -> usize;

    /// Fill `buffer` from the bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the range runs past [`capacity`](Self::capacity),
    /// or the backend's I/O error.
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<()>;

    /// Store `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the range runs past [`capacity`](Self::capacity),
    /// or the backend's I/O error.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    /// Make every earlier write durable.
    ///
    /// Media that store each write immediately need not override this.
    ///
    /// # Errors
    ///
    /// Returns the backend's I/O error.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A medium held in RAM. Used on the host and in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RamMedium<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> RamMedium<N> {
    /// A medium in the erased state, every byte `0xFF` as on fresh EEPROM or flash.
    #[must_use]
    pub const fn erased() -> Self {
        Self { bytes: [0xFF; N] }
    }

    /// A medium with every byte zero.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self { bytes: [0; N] }
    }

    /// Raw contents.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Medium for RamMedium<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<()> {
        let source = byte_range(&self.bytes, offset, buffer.len())?;
        buffer.copy_from_slice(source);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset
            .checked_add(data.len())
            .ok_or(Error::IndexOutOfBounds)?;
        let target = self
            .bytes
            .get_mut(offset..end)
            .ok_or(Error::IndexOutOfBounds)?;
        target.copy_from_slice(data);
        Ok(())
    }
}

pub(crate) fn byte_range(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(Error::IndexOutOfBounds)?;
    bytes.get(offset..end).ok_or(Error::IndexOutOfBounds)
}
