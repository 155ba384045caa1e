use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use grid_quant::{Palette, Rgb};
use image::RgbImage;

use crate::error::ParameterError;
use crate::models::SessionSettings;
use crate::services::quantizer;

/// Opaque session identifier: 16 uppercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        use rand::Rng;
        Self(format!("{:016X}", rand::thread_rng().gen::<u64>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's uploaded image plus their settings and palette edits.
///
/// Palettes are never stored: the derived palette is recomputed from the
/// source on every call, and edits are kept as per-index overrides.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    source: Arc<RgbImage>,
    settings: SessionSettings,
    overrides: BTreeMap<usize, Rgb>,
}

impl Session {
    pub fn new(id: SessionId, source: Arc<RgbImage>, settings: SessionSettings) -> Self {
        Self {
            id,
            source,
            settings,
            overrides: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn source(&self) -> &Arc<RgbImage> {
        &self.source
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn overrides(&self) -> &BTreeMap<usize, Rgb> {
        &self.overrides
    }

    /// Palette derived from the source with the current settings.
    pub fn derived_palette(&self) -> Palette {
        quantizer::derive_palette(
            &self.source,
            self.settings.grid,
            self.settings.color_count,
            self.settings.options.resample,
        )
    }

    /// Derived palette with the user's overrides applied.
    pub fn current_palette(&self) -> Palette {
        apply_overrides(
            &self.derived_palette(),
            &self.overrides,
            self.settings.color_count,
        )
    }

    pub fn set_override(&mut self, index: usize, color: Rgb) -> Result<(), ParameterError> {
        let len = self.settings.color_count as usize;
        if index >= len {
            return Err(ParameterError::IndexOutOfRange { index, len });
        }
        self.overrides.insert(index, color);
        Ok(())
    }

    pub fn reset_palette(&mut self) {
        self.overrides.clear();
    }

    /// Replace the settings. Overrides survive, including ones past the new
    /// color count, which come back if the count grows again.
    pub fn update_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }
}

/// First `color_count` entries of `derived`, with overrides substituted.
/// Overrides at or past `color_count` are ignored.
pub fn apply_overrides(
    derived: &Palette,
    overrides: &BTreeMap<usize, Rgb>,
    color_count: u32,
) -> Palette {
    let colors: Vec<Rgb> = (0..color_count as usize)
        .map(|i| {
            overrides
                .get(&i)
                .copied()
                .or_else(|| derived.colors().get(i).copied())
                .unwrap_or(Rgb::WHITE)
        })
        .collect();
    Palette::from_colors_padded(&colors, color_count as usize, Rgb::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridSpec, RenderOptions, ResampleFilter};
    use image::Rgb as Pixel;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const GOLD: Rgb = Rgb::new(255, 215, 0);

    fn session(colors: u32) -> Session {
        let source = RgbImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Pixel([255, 0, 0])
            } else {
                Pixel([0, 0, 255])
            }
        });
        let options = RenderOptions {
            resample: ResampleFilter::Nearest,
            ..Default::default()
        };
        let settings = SessionSettings::new(GridSpec::new(8, 8).unwrap(), colors, options);
        Session::new(SessionId::generate(), Arc::new(source), settings)
    }

    #[test]
    fn test_session_id_format() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        assert_ne!(SessionId::generate(), id);
    }

    #[test]
    fn test_current_palette_without_overrides_is_derived() {
        let s = session(4);
        assert_eq!(s.current_palette(), s.derived_palette());
        assert_eq!(s.current_palette().colors(), &[RED, BLUE, Rgb::WHITE, Rgb::WHITE]);
    }

    #[test]
    fn test_override_and_reset() {
        let mut s = session(4);
        s.set_override(1, GOLD).unwrap();
        assert_eq!(s.current_palette().colors(), &[RED, GOLD, Rgb::WHITE, Rgb::WHITE]);

        s.reset_palette();
        assert!(s.overrides().is_empty());
        assert_eq!(s.current_palette(), s.derived_palette());
    }

    #[test]
    fn test_override_index_out_of_range() {
        let mut s = session(4);
        let err = s.set_override(4, GOLD).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::IndexOutOfRange { index: 4, len: 4 }
        ));
    }

    #[test]
    fn test_stale_overrides_are_ignored_then_restored() {
        let mut s = session(4);
        s.set_override(3, GOLD).unwrap();

        let mut settings = *s.settings();
        settings.color_count = 2;
        s.update_settings(settings);
        assert_eq!(s.current_palette().colors(), &[RED, BLUE]);

        settings.color_count = 4;
        s.update_settings(settings);
        assert_eq!(s.current_palette().get(3), GOLD);
    }

    #[test]
    fn test_apply_overrides_pads_short_derived() {
        let derived = Palette::new(&[RED]).unwrap();
        let overrides = BTreeMap::from([(2, GOLD), (7, BLUE)]);
        let palette = apply_overrides(&derived, &overrides, 3);
        assert_eq!(palette.colors(), &[RED, Rgb::WHITE, GOLD]);
    }
}
