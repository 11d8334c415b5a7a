//! The marker display: live settings, rendering and persistence in one owner.
//!
//! See [`MarkerDisplay`] for the command flow.

use crate::command::Command;
use crate::fmt::{log_error, log_info, log_warn};
use crate::led_strip::{LedStripDriver, apply_brightness, rgb_to_u32};
use crate::marker::{
    BorderRow, LED_COUNT, OffColor, StripFrame, add_border, render_marker,
};
use crate::settings::{DisplayConfig, Medium, SettingsStore};
use crate::Result;

/// How a [`DisplayConfig`] is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOptions {
    /// Value of the outermost border rows.
    pub border_row: BorderRow,
    /// Color of clear cells.
    pub off_color: OffColor,
}

/// Owns the LED strip, the settings store and the live [`DisplayConfig`].
///
/// Every accepted [`Command`] updates the config and then redraws the whole
/// matrix with one frame commit: a black frame, the bordered marker in the
/// top-left corner, scaled to the configured brightness.
///
/// ```rust
/// # use colaruco::led_strip::{Frame1d, LedStripDriver};
/// use colaruco::command::Command;
/// use colaruco::display::MarkerDisplay;
/// use colaruco::led_strip::colors;
/// use colaruco::settings::{RamMedium, SettingsStore};
///
/// # struct NullStrip;
/// # impl LedStripDriver<100> for NullStrip {
/// #     async fn write_frame(&mut self, _frame: &Frame1d<100>) -> colaruco::Result<()> {
/// #         Ok(())
/// #     }
/// # }
/// # embassy_futures::block_on(async {
/// let store = SettingsStore::new(RamMedium::<2048>::erased())?;
/// let mut display = MarkerDisplay::new(NullStrip, store);
/// display.start().await?; // nothing saved yet: the default config
///
/// display.handle(Command::Color(colors::LIME)).await?;
/// display.handle(Command::Brightness(128)).await?;
/// display.handle(Command::Save).await?;
/// assert_eq!(display.config().brightness, 128);
/// # Ok::<(), colaruco::Error>(())
/// # })?;
/// # Ok::<(), colaruco::Error>(())
/// ```
pub struct MarkerDisplay<S, M> {
    strip: S,
    store: SettingsStore<M>,
    config: DisplayConfig,
    options: RenderOptions,
}

impl<S, M> MarkerDisplay<S, M>
where
    S: LedStripDriver<LED_COUNT>,
    M: Medium,
{
    /// Create a display showing nothing yet, with the default config and options.
    #[must_use]
    pub fn new(strip: S, store: SettingsStore<M>) -> Self {
        Self {
            strip,
            store,
            config: DisplayConfig::default(),
            options: RenderOptions::default(),
        }
    }

    /// Replace the render options. Takes effect at the next redraw.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Restore the last saved config, or keep the default on a cold start, and draw it.
    ///
    /// # Errors
    ///
    /// Returns the store's medium error or the strip's write error.
    pub async fn start(&mut self) -> Result<()> {
        self.restore()?;
        self.redraw().await
    }

    /// Apply one command and redraw.
    ///
    /// # Errors
    ///
    /// Returns the store's medium error or the strip's write error.
    pub async fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Test => {
                self.strip.write_frame(&StripFrame::new()).await?;
                log_info!("Display: test clear");
            }
            Command::Save => {
                self.store
                    .save(&self.config)
                    .inspect_err(|err| log_error!("Display: saving settings failed: {}", err))?;
            }
            Command::Load => self.restore()?,
            Command::Code(code) => {
                add_border(&code, self.options.border_row)?;
                self.config.code = code;
            }
            Command::Brightness(brightness) => self.config.brightness = brightness,
            Command::Color(color) => self.config.color = color,
        }
        self.redraw().await
    }

    /// Draw the current config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodeTooLarge`](crate::Error::CodeTooLarge) if the code does not fit,
    /// or the strip's write error.
    pub async fn redraw(&mut self) -> Result<()> {
        let mut frame = render_marker(
            &self.config.code,
            self.config.color,
            self.options.border_row,
            self.options.off_color,
        )?;
        apply_brightness(&mut frame, self.config.brightness);
        self.strip.write_frame(&frame).await?;
        log_info!(
            "Display: code size {} color {=u32:06x} brightness {}",
            self.config.code.size(),
            rgb_to_u32(self.config.color),
            self.config.brightness
        );
        Ok(())
    }

    /// Load the saved config if there is one whose code still fits the matrix.
    fn restore(&mut self) -> Result<()> {
        let Some(saved) = self.store.load()? else {
            return Ok(());
        };
        if add_border(&saved.code, self.options.border_row).is_err() {
            log_warn!(
                "Display: saved code size {} does not fit, keeping current settings",
                saved.code.size()
            );
            return Ok(());
        }
        self.config = saved;
        Ok(())
    }

    /// The live config.
    #[must_use]
    pub const fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// The render options in use.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The settings store.
    #[must_use]
    pub const fn store(&self) -> &SettingsStore<M> {
        &self.store
    }

    /// The LED strip.
    #[must_use]
    pub const fn strip(&self) -> &S {
        &self.strip
    }
}
