//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighboring pixels that have not been visited yet.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` and a weight. A neighbor receives
/// `error * weight / divisor`. Most kernels propagate 100% of the error;
/// Atkinson intentionally propagates only 75%.
///
/// `max_dy` is how many rows ahead the kernel reaches, which sizes the
/// error buffer at `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `(dx, dy, weight)` entries. `dx` is flipped on serpentine reverse rows.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the error this kernel propagates (1.0 = all of it).
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson dithering kernel, 75% propagation (6/8).
///
/// Keeps flat areas flatter than Floyd-Steinberg, which suits very small
/// grids where every cell is visible.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),  // right
        (2, 0, 1),  // two right
        (-1, 1, 1), // bottom-left
        (0, 1, 1),  // bottom
        (1, 1, 1),  // bottom-right
        (0, 2, 1),  // two below
    ],
    divisor: 8,
    max_dy: 2,
};
