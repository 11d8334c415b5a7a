#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the marker display controller.

use colaruco::Result;
use colaruco::command::Command;
use colaruco::display::{MarkerDisplay, RenderOptions};
use colaruco::led_strip::{Frame1d, LedStripDriver, Rgb, colors, rgb_from_u32};
use colaruco::marker::{BorderRow, LED_COUNT, LogicalCode, OffColor};
use colaruco::settings::{DisplayConfig, REQUIRED_CAPACITY, RamMedium, SettingsStore};
use embassy_futures::block_on;

type Medium = RamMedium<REQUIRED_CAPACITY>;

/// Keeps every committed frame.
#[derive(Default)]
struct RecordingStrip {
    frames: Vec<Frame1d<LED_COUNT>>,
}

impl LedStripDriver<LED_COUNT> for RecordingStrip {
    async fn write_frame(&mut self, frame: &Frame1d<LED_COUNT>) -> Result<()> {
        self.frames.push(*frame);
        Ok(())
    }
}

fn display_on(medium: Medium) -> MarkerDisplay<RecordingStrip, Medium> {
    let store = SettingsStore::new(medium).expect("medium fits");
    MarkerDisplay::new(RecordingStrip::default(), store)
}

fn last_frame(display: &MarkerDisplay<RecordingStrip, Medium>) -> Frame1d<LED_COUNT> {
    *display.strip().frames.last().expect("a frame was written")
}

fn count(frame: &Frame1d<LED_COUNT>, color: Rgb) -> usize {
    frame.iter().filter(|pixel| **pixel == color).count()
}

#[test]
fn cold_start_shows_default_config() {
    let mut display = display_on(Medium::erased());
    block_on(display.start()).expect("starts");

    assert_eq!(display.config(), &DisplayConfig::default());
    assert_eq!(display.strip().frames.len(), 1);
    assert_eq!(count(&last_frame(&display), colors::BLACK), LED_COUNT);
}

#[test]
fn start_restores_saved_config() {
    let saved = DisplayConfig {
        color: colors::WHITE,
        brightness: 255,
        code: LogicalCode::new(&[0b10, 0b01]).expect("code fits"),
    };
    let mut store = SettingsStore::new(Medium::erased()).expect("medium fits");
    store.save(&saved).expect("writes");

    let mut display = display_on(store.into_inner());
    block_on(display.start()).expect("starts");

    assert_eq!(display.config(), &saved);
    let frame = last_frame(&display);
    assert_eq!(count(&frame, colors::WHITE), 10);
    assert_eq!(frame[20], colors::WHITE);
}

#[test]
fn start_ignores_saved_code_that_does_not_fit() {
    let saved = DisplayConfig {
        code: LogicalCode::from_raw(8, [0; 7]),
        ..DisplayConfig::default()
    };
    let mut store = SettingsStore::new(Medium::erased()).expect("medium fits");
    store.save(&saved).expect("writes");

    let mut display = display_on(store.into_inner());
    block_on(display.start()).expect("starts");
    assert_eq!(display.config(), &DisplayConfig::default());
}

#[test]
fn every_command_redraws() {
    let mut display = display_on(Medium::erased());
    block_on(async {
        display.start().await?;
        display.handle(Command::Color(colors::WHITE)).await?;
        display.handle(Command::Brightness(255)).await?;
        display
            .handle(Command::Code(LogicalCode::new(&[0b11]).expect("code fits")))
            .await
    })
    .expect("commands succeed");

    assert_eq!(display.strip().frames.len(), 4);
    // 5×5 grid: two corner rows, and the code row lights its border and the code bit.
    assert_eq!(count(&last_frame(&display), colors::WHITE), 2 + 2 + 3);
}

#[test]
fn brightness_scales_the_frame() {
    let mut display = display_on(Medium::erased());
    block_on(async {
        display.handle(Command::Color(colors::WHITE)).await?;
        display.handle(Command::Brightness(128)).await
    })
    .expect("commands succeed");

    let frame = last_frame(&display);
    assert_eq!(frame[19], Rgb::new(128, 128, 128));
}

#[test]
fn test_command_clears_then_redraws() {
    let mut display = display_on(Medium::erased());
    block_on(async {
        display.handle(Command::Color(colors::RED)).await?;
        display.handle(Command::Brightness(255)).await?;
        display.handle(Command::Test).await
    })
    .expect("commands succeed");

    let frames = &display.strip().frames;
    assert_eq!(frames.len(), 4);
    assert_eq!(count(&frames[2], colors::BLACK), LED_COUNT);
    assert_eq!(frames[3], frames[1]);
}

#[test]
fn save_and_load_round_trip_color_and_brightness() {
    let mut display = display_on(Medium::erased());
    block_on(async {
        display.handle(Command::Color(rgb_from_u32(0xFF_0000))).await?;
        display.handle(Command::Brightness(200)).await?;
        display.handle(Command::Save).await?;
        display.handle(Command::Color(colors::BLUE)).await?;
        display.handle(Command::Brightness(3)).await?;
        display.handle(Command::Load).await
    })
    .expect("commands succeed");

    assert_eq!(display.config().color, rgb_from_u32(0xFF_0000));
    assert_eq!(display.config().brightness, 200);
    assert_eq!(display.store().medium().as_bytes()[REQUIRED_CAPACITY - 1], 0);
}

#[test]
fn load_on_cold_medium_keeps_current_config() {
    let mut display = display_on(Medium::erased());
    block_on(async {
        display.handle(Command::Brightness(42)).await?;
        display.handle(Command::Load).await
    })
    .expect("commands succeed");
    assert_eq!(display.config().brightness, 42);
}

#[test]
fn options_change_border_and_off_color() {
    let options = RenderOptions {
        border_row: BorderRow::Solid,
        off_color: OffColor::Contrast,
    };
    let store = SettingsStore::new(Medium::erased()).expect("medium fits");
    let mut display = MarkerDisplay::new(RecordingStrip::default(), store).with_options(options);
    block_on(async {
        display.handle(Command::Color(colors::RED)).await?;
        display.handle(Command::Brightness(255)).await
    })
    .expect("commands succeed");

    assert_eq!(display.options(), &options);
    let frame = last_frame(&display);
    // 4×4 frame: 12 border cells lit, 4 inner cells in the contrast color.
    assert_eq!(count(&frame, colors::RED), 12);
    assert_eq!(count(&frame, Rgb::new(0, 255, 255)), 4);
    assert_eq!(count(&frame, colors::BLACK), LED_COUNT - 16);
}
