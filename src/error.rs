//! Crate-wide error type.

use derive_more::{Display, Error};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported at the rendering and storage boundaries.
///
/// Malformed serial commands are not errors; the
/// [`CommandParser`](crate::command::CommandParser) drops them silently.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The code is wider than the matrix can show once bordered.
    #[display("code size {size} exceeds the maximum of {}", crate::marker::MAX_CODE_SIZE)]
    CodeTooLarge {
        /// Requested code size.
        size: u8,
    },

    /// A medium access fell outside the medium.
    #[display("index out of bounds")]
    IndexOutOfBounds,

    /// The medium cannot hold every settings slot plus the slot index.
    #[display("medium holds {capacity} bytes but settings need {required}")]
    MediumTooSmall {
        /// Capacity reported by the medium.
        capacity: usize,
        /// Bytes required by the slot layout.
        required: usize,
    },

    /// The flash driver failed to read, erase or program.
    #[display("flash operation failed")]
    Flash,

    /// The executor could not spawn a task.
    #[display("task spawn failed")]
    TaskSpawn,

    /// Reading from the serial command channel failed.
    #[display("serial read failed")]
    Serial,
}
