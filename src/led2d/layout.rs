//! Compile-time description of how a rectangular LED panel is wired.
//!
//! See [`LedLayout`].

/// Compile-time description of panel geometry and wiring.
///
/// `LedLayout` maps the linear wiring order of a NeoPixel-style panel to
/// `(x, y)` cells. Coordinates use a screen-style convention: `(0, 0)` is the
/// top-left corner, `x` increases to the right and `y` increases downward.
///
/// Layouts are validated when constructed (at compile time for `const`
/// layouts): every coordinate must be in bounds and every cell must appear
/// exactly once.
///
/// # Example
///
/// ```rust
/// use colaruco::led2d::layout::LedLayout;
///
/// const MAP: LedLayout<6, 3, 2> = LedLayout::serpentine_row_major();
/// const EXPECTED: LedLayout<6, 3, 2> =
///     LedLayout::new([(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]);
/// const _: () = assert!(MAP.equals(&EXPECTED));
/// ```
///
/// ```text
/// Strip snakes across rows (3×2 example):
///   LED0  LED1  LED2
///   LED5  LED4  LED3
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedLayout<const N: usize, const W: usize, const H: usize> {
    map: [(u16, u16); N],
}

impl<const N: usize, const W: usize, const H: usize> LedLayout<N, W, H> {
    /// Return the array mapping LED wiring order to `(x, y)` coordinates.
    #[must_use]
    pub const fn index_to_xy(&self) -> &[(u16, u16); N] {
        &self.map
    }

    /// Invert the layout: entry `y * W + x` holds the LED index wired to `(x, y)`.
    ///
    /// ```rust
    /// use colaruco::led2d::layout::LedLayout;
    ///
    /// const MAP: LedLayout<6, 3, 2> = LedLayout::serpentine_row_major();
    /// assert_eq!(MAP.xy_to_index(), [0, 1, 2, 5, 4, 3]);
    /// ```
    #[must_use]
    pub const fn xy_to_index(&self) -> [u16; N] {
        assert!(
            N <= u16::MAX as usize,
            "total LEDs must fit in u16 for xy_to_index"
        );

        let mut mapping = [None; N];

        let mut led_index = 0;
        while led_index < N {
            let (col, row) = self.map[led_index];
            let target_index = row as usize * W + col as usize;

            let slot = &mut mapping[target_index];
            assert!(
                slot.is_none(),
                "duplicate (col,row) in xy_to_index inversion"
            );
            *slot = Some(led_index as u16);

            led_index += 1;
        }

        let mut finalized = [0u16; N];
        let mut cell = 0;
        while cell < N {
            finalized[cell] = match mapping[cell] {
                Some(led_index) => led_index,
                None => panic!("xy_to_index requires every (col,row) to be covered"),
            };
            cell += 1;
        }

        finalized
    }

    /// Const equality helper for compile-time assertions.
    #[must_use]
    pub const fn equals(&self, other: &Self) -> bool {
        let mut index = 0;
        while index < N {
            if self.map[index].0 != other.map[index].0 || self.map[index].1 != other.map[index].1 {
                return false;
            }
            index += 1;
        }
        true
    }

    /// Constructor: verifies the mapping covers every cell of the W×H panel exactly once.
    ///
    /// Entry `i` is the `(x, y)` cell lit by LED `i`.
    #[must_use]
    pub const fn new(map: [(u16, u16); N]) -> Self {
        assert!(W > 0 && H > 0, "W and H must be positive");
        assert!(W * H == N, "W*H must equal N");

        let mut seen = [false; N];

        let mut index = 0;
        while index < N {
            let (col, row) = map[index];
            let col = col as usize;
            let row = row as usize;

            assert!(col < W, "column out of bounds");
            assert!(row < H, "row out of bounds");

            let cell = row * W + col;
            assert!(!seen[cell], "duplicate (col,row) in mapping");
            seen[cell] = true;

            index += 1;
        }

        let mut cell = 0;
        while cell < N {
            assert!(seen[cell], "mapping does not cover every cell");
            cell += 1;
        }

        Self { map }
    }

    /// Serpentine row-major wiring: even rows run left-to-right, odd rows right-to-left.
    ///
    /// This is how the 10×10 marker matrix is wired (see
    /// [`PANEL_LAYOUT`](crate::marker::PANEL_LAYOUT)).
    ///
    /// ```text
    /// 4×3 example:
    ///   LED0   LED1   LED2   LED3
    ///   LED7   LED6   LED5   LED4
    ///   LED8   LED9   LED10  LED11
    /// ```
    #[must_use]
    pub const fn serpentine_row_major() -> Self {
        assert!(W > 0 && H > 0, "W and H must be positive");
        assert!(W * H == N, "W*H must equal N");

        let mut mapping = [(0_u16, 0_u16); N];
        let mut y_index = 0;
        while y_index < H {
            let mut x_index = 0;
            while x_index < W {
                let led_index = if y_index % 2 == 0 {
                    y_index * W + x_index
                } else {
                    y_index * W + (W - 1 - x_index)
                };
                mapping[led_index] = (x_index as u16, y_index as u16);
                x_index += 1;
            }
            y_index += 1;
        }
        Self::new(mapping)
    }
}
