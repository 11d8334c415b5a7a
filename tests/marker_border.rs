#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for border padding.

use colaruco::Error;
use colaruco::led_strip::{Rgb, colors, rgb_from_u32};
use colaruco::marker::{BorderRow, LogicalCode, MAX_CODE_SIZE, OffColor, add_border};

#[test]
fn two_by_two_code_borders_to_expected_rows() {
    let code = LogicalCode::new(&[0b10, 0b01]).expect("code fits");
    let grid = add_border(&code, BorderRow::AsShipped).expect("grid fits");
    assert_eq!(grid.size(), 6);
    assert_eq!(grid.rows(), &[64, 33, 41, 37, 33, 64]);
}

#[test]
fn border_rows_as_shipped_set_the_bit_past_the_row() {
    for size in 1..=MAX_CODE_SIZE {
        let rows = [0u8; 6];
        let code = LogicalCode::new(&rows[..usize::from(size)]).expect("code fits");
        let grid = add_border(&code, BorderRow::AsShipped).expect("grid fits");
        let grid_size = size + 4;
        let last = usize::from(grid_size) - 1;

        assert_eq!(grid.size(), grid_size);
        assert_eq!(grid.rows()[0], 1 << grid_size);
        assert_eq!(grid.rows()[last], 1 << grid_size);
        assert_eq!(grid.rows()[1], (1 << (size + 3)) + 1);
        assert_eq!(grid.rows()[last - 1], (1 << (size + 3)) + 1);
    }
}

#[test]
fn border_rows_solid_fill_the_row() {
    for size in 1..=MAX_CODE_SIZE {
        let code = LogicalCode::from_raw(size, [0; 7]);
        let grid = add_border(&code, BorderRow::Solid).expect("grid fits");
        let grid_size = size + 4;
        let last = usize::from(grid_size) - 1;

        assert_eq!(grid.rows()[0], (1 << grid_size) - 1);
        assert_eq!(grid.rows()[last], (1 << grid_size) - 1);
        assert_eq!(grid.rows()[1], (1 << (size + 3)) + 1);
    }
}

#[test]
fn as_shipped_outer_rows_are_unlit_and_solid_are_lit() {
    let code = LogicalCode::new(&[0b101, 0b010, 0b111]).expect("code fits");
    let shipped = add_border(&code, BorderRow::AsShipped).expect("grid fits");
    let solid = add_border(&code, BorderRow::Solid).expect("grid fits");

    for x_index in 0..7 {
        assert!(!shipped.is_set(x_index, 0));
        assert!(!shipped.is_set(x_index, 6));
        assert!(solid.is_set(x_index, 0));
        assert!(solid.is_set(x_index, 6));
    }
    // Everything else is identical.
    assert_eq!(shipped.rows()[1..6], solid.rows()[1..6]);
}

#[test]
fn interior_rows_frame_the_code() {
    let code = LogicalCode::new(&[0b101, 0b010, 0b111]).expect("code fits");
    let grid = add_border(&code, BorderRow::AsShipped).expect("grid fits");
    // Columns: border, gap, code bits (MSB first), gap, border.
    let lit: Vec<bool> = (0..7).map(|x_index| grid.is_set(x_index, 2)).collect();
    assert_eq!(lit, [true, false, true, false, true, false, true]);
    let lit: Vec<bool> = (0..7).map(|x_index| grid.is_set(x_index, 3)).collect();
    assert_eq!(lit, [true, false, false, true, false, false, true]);
    let lit: Vec<bool> = (0..7).map(|x_index| grid.is_set(x_index, 4)).collect();
    assert_eq!(lit, [true, false, true, true, true, false, true]);
}

#[test]
fn size_zero_is_a_bare_frame() {
    let grid = add_border(&LogicalCode::EMPTY, BorderRow::AsShipped).expect("grid fits");
    assert_eq!(grid.size(), 4);
    assert_eq!(grid.rows(), &[16, 9, 9, 16]);
}

#[test]
fn row_bits_above_size_are_ignored() {
    let code = LogicalCode::new(&[0xFF, 0xFF]).expect("code fits");
    let grid = add_border(&code, BorderRow::AsShipped).expect("grid fits");
    assert_eq!(grid.rows()[2], 32 + (0b11 << 2) + 1);
    assert_eq!(grid.rows()[3], 32 + (0b11 << 2) + 1);
}

#[test]
fn oversize_codes_are_rejected() {
    assert_eq!(
        LogicalCode::new(&[0; 7]),
        Err(Error::CodeTooLarge { size: 7 })
    );
    let stored = LogicalCode::from_raw(9, [0; 7]);
    assert_eq!(
        add_border(&stored, BorderRow::AsShipped),
        Err(Error::CodeTooLarge { size: 9 })
    );
}

#[test]
fn logical_code_keeps_only_its_rows() {
    let code = LogicalCode::new(&[3, 1, 2]).expect("code fits");
    assert_eq!(code.size(), 3);
    assert_eq!(code.rows(), &[3, 1, 2]);
    assert_eq!(code.raw_rows(), &[3, 1, 2, 0, 0, 0, 0]);
}

#[test]
fn off_color_black_and_contrast() {
    assert_eq!(OffColor::Black.resolve(colors::RED), colors::BLACK);
    assert_eq!(OffColor::Contrast.resolve(colors::RED), Rgb::new(0, 255, 255));
    assert_eq!(
        OffColor::Contrast.resolve(rgb_from_u32(0x12_3456)),
        rgb_from_u32(0xFF_FFFF - 0x12_3456)
    );
}
