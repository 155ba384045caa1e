//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::num::ParseIntError;
use thiserror::Error;

/// Error type for parsing hex color strings.
///
/// Returned when parsing a hex color string fails, either due to
/// invalid length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No colors provided in palette
    #[error("palette cannot be empty")]
    EmptyPalette,
    /// More colors than an 8-bit index can address
    #[error("palette has {count} colors (max {max})")]
    TooManyColors {
        /// Number of colors supplied
        count: usize,
        /// Largest supported palette
        max: usize,
    },
    /// Invalid hex color string
    #[error("invalid color at index {index}: {source}")]
    ParseColor {
        /// Position of the offending entry
        index: usize,
        /// Underlying parse failure
        source: ParseColorError,
    },
}
