#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the rotating settings store.

use colaruco::Error;
use colaruco::led_strip::{colors, rgb_from_u32};
use colaruco::marker::LogicalCode;
use colaruco::settings::{
    DisplayConfig, Medium, RECORD_SIZE, REQUIRED_CAPACITY, RamMedium, SLOT_COUNT, SLOT_LIMIT,
    SettingsStore,
};
use proptest::prelude::*;

const CAPACITY: usize = REQUIRED_CAPACITY;

fn config(brightness: u8) -> DisplayConfig {
    DisplayConfig {
        color: rgb_from_u32(0xFF_0000),
        brightness,
        code: LogicalCode::new(&[0b10, 0b01]).expect("code fits"),
    }
}

#[test]
fn layout_constants() {
    assert_eq!(RECORD_SIZE, 13);
    assert_eq!(SLOT_LIMIT, 102);
    assert_eq!(SLOT_COUNT, 103);
    assert_eq!(REQUIRED_CAPACITY, 1340);
}

#[test]
fn small_medium_is_rejected() {
    let result = SettingsStore::new(RamMedium::<1339>::zeroed());
    assert!(matches!(
        result,
        Err(Error::MediumTooSmall {
            capacity: 1339,
            required: 1340
        })
    ));
    assert!(SettingsStore::new(RamMedium::<CAPACITY>::zeroed()).is_ok());
}

#[test]
fn erased_medium_loads_nothing() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    assert_eq!(store.slot_index().expect("reads"), 0xFF);
    assert_eq!(store.load().expect("reads"), None);
}

#[test]
fn zeroed_medium_loads_zeroed_config() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::zeroed()).expect("fits");
    assert_eq!(store.load().expect("reads"), Some(DisplayConfig::default()));
}

#[test]
fn first_save_on_erased_medium_uses_slot_zero() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    assert_eq!(store.save(&config(128)).expect("writes"), 0);
    assert_eq!(store.slot_index().expect("reads"), 0);
    assert_eq!(store.load().expect("reads"), Some(config(128)));
}

#[test]
fn record_bytes_match_layout() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    store.save(&config(128)).expect("writes");
    let bytes = store.medium().as_bytes();
    assert_eq!(
        bytes[..RECORD_SIZE],
        [2, 0b10, 0b01, 0, 0, 0, 0, 0, 128, 0x00, 0x00, 0xFF, 0x00]
    );
    // The next slot is untouched and the index sits in the last byte.
    assert!(bytes[RECORD_SIZE..2 * RECORD_SIZE].iter().all(|&byte| byte == 0xFF));
    assert_eq!(bytes[CAPACITY - 1], 0);
}

#[test]
fn save_advances_then_writes() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::zeroed()).expect("fits");
    assert_eq!(store.save(&config(1)).expect("writes"), 1);
    assert_eq!(store.save(&config(2)).expect("writes"), 2);
    let bytes = store.medium().as_bytes();
    // Slot 0 keeps its zeroed contents.
    assert!(bytes[..RECORD_SIZE].iter().all(|&byte| byte == 0));
    assert_eq!(bytes[RECORD_SIZE + 8], 1);
    assert_eq!(bytes[2 * RECORD_SIZE + 8], 2);
    assert_eq!(store.load().expect("reads"), Some(config(2)));
}

#[test]
fn slot_index_wraps_once_over_slot_limit_plus_two_saves() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::zeroed()).expect("fits");
    let mut wraps = 0;
    let mut previous = store.slot_index().expect("reads");
    for save in 0..usize::from(SLOT_LIMIT) + 2 {
        let brightness = u8::try_from(save).expect("fits in u8");
        let slot = store.save(&config(brightness)).expect("writes");
        if slot < previous {
            wraps += 1;
            assert_eq!(slot, 0);
            // The wrapped slot holds the newest save, not the first.
            assert_eq!(store.load().expect("reads"), Some(config(brightness)));
        }
        previous = slot;
    }
    assert_eq!(wraps, 1);
    assert_eq!(store.slot_index().expect("reads"), 1);
}

#[test]
fn every_slot_is_used_once_per_rotation() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    let slots: Vec<u8> = (0..SLOT_COUNT)
        .map(|_| store.save(&config(7)).expect("writes"))
        .collect();
    let expected: Vec<u8> = (0..=SLOT_LIMIT).collect();
    assert_eq!(slots, expected);
    assert_eq!(store.slot_index().expect("reads"), SLOT_LIMIT);
    assert_eq!(store.save(&config(8)).expect("writes"), 0);
}

#[test]
fn slot_index_lives_at_the_last_byte_of_larger_media() {
    let mut store = SettingsStore::new(RamMedium::<4096>::erased()).expect("fits");
    store.save(&config(9)).expect("writes");
    store.save(&config(10)).expect("writes");
    assert_eq!(store.medium().as_bytes()[4095], 1);
    assert_eq!(store.load().expect("reads"), Some(config(10)));
}

#[test]
fn ram_medium_rejects_out_of_range_access() {
    let mut medium = RamMedium::<16>::zeroed();
    let mut buffer = [0u8; 4];
    assert_eq!(medium.read(13, &mut buffer), Err(Error::IndexOutOfBounds));
    assert_eq!(medium.write(usize::MAX, &[1, 2]), Err(Error::IndexOutOfBounds));
    assert_eq!(medium.write(12, &[1, 2, 3, 4]), Ok(()));
    assert_eq!(medium.read(12, &mut buffer), Ok(()));
    assert_eq!(buffer, [1, 2, 3, 4]);
}

#[test]
fn stored_codes_are_not_validated() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    let odd = DisplayConfig {
        code: LogicalCode::from_raw(9, [1, 2, 3, 4, 5, 6, 7]),
        ..DisplayConfig::default()
    };
    store.save(&odd).expect("writes");
    assert_eq!(store.load().expect("reads"), Some(odd));
}

#[test]
fn color_and_brightness_round_trip() {
    let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
    let saved = DisplayConfig {
        color: colors::RED,
        brightness: 200,
        code: LogicalCode::EMPTY,
    };
    store.save(&saved).expect("writes");
    let loaded = store.load().expect("reads").expect("saved");
    assert_eq!(loaded.color, rgb_from_u32(0xFF_0000));
    assert_eq!(loaded.brightness, 200);
}

proptest! {
    #[test]
    fn save_then_load_returns_the_same_config(
        color in 0u32..=0xFF_FFFF,
        brightness in any::<u8>(),
        rows in prop::collection::vec(any::<u8>(), 0..=6),
        prior_saves in 0usize..300,
    ) {
        let mut store = SettingsStore::new(RamMedium::<CAPACITY>::erased()).expect("fits");
        for _ in 0..prior_saves {
            store.save(&DisplayConfig::default()).expect("writes");
        }
        let saved = DisplayConfig {
            color: rgb_from_u32(color),
            brightness,
            code: LogicalCode::new(&rows).expect("code fits"),
        };
        store.save(&saved).expect("writes");
        prop_assert_eq!(store.load().expect("reads"), Some(saved));
    }
}
