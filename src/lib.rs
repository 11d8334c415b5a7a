//! Show ArUco-style fiducial markers on a 10×10 WS2812 matrix and remember the
//! last settings across power cycles.
//!
//! - [`marker`] borders a [`LogicalCode`](marker::LogicalCode) and lays it out
//!   on the serpentine-wired matrix.
//! - [`settings`] persists the [`DisplayConfig`](settings::DisplayConfig) in
//!   rotating slots on a byte [`Medium`](settings::Medium).
//! - [`command`] parses the serial console's text commands.
//! - [`display`] ties them together behind one
//!   [`MarkerDisplay`](display::MarkerDisplay).
//!
//! With the `host` feature (the default) the crate builds for the host with
//! `std`, so everything except the RP2040 backends can be tested there. The
//! `embedded` feature builds the board backends for the Pico 1.
#![cfg_attr(not(feature = "host"), no_std)]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Compile-time checks: a board must be selected unless testing with the host feature
#[cfg(all(not(feature = "pico1"), not(feature = "host")))]
compile_error!("Must enable the board feature 'pico1' or the 'host' feature");

#[cfg(all(not(feature = "arm"), not(feature = "host")))]
compile_error!("Must enable the architecture feature 'arm' or the 'host' feature");

#[cfg(all(feature = "pico1", feature = "host"))]
compile_error!("Cannot enable both 'pico1' and 'host' features simultaneously");

mod fmt;

pub mod command;
pub mod display;
mod error;
pub mod led2d;
pub mod led_strip;
pub mod marker;
pub mod settings;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
