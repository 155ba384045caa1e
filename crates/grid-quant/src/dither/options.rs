//! Dithering options.

/// Configuration for error diffusion.
///
/// The defaults match a plain left-to-right Floyd-Steinberg pass:
/// no serpentine scanning and no error clamp beyond the 8-bit channel range.
///
/// ```
/// use grid_quant::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(true);
/// assert!(options.serpentine);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DitherOptions {
    /// Alternate scan direction on odd rows and mirror the kernel.
    ///
    /// Default: `false`
    pub serpentine: bool,
}

impl DitherOptions {
    /// Options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }
}
