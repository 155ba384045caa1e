//! Color types
//!
//! Everything in this crate works on 8-bit sRGB triples; see [`Rgb`].

mod rgb;

pub use rgb::Rgb;
