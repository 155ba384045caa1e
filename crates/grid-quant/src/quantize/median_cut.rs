//! Median cut palette derivation.

use crate::color::Rgb;

/// An axis-aligned box in RGB space holding a subset of the pixels.
#[derive(Debug, Clone)]
struct ColorBox {
    pixels: Vec<Rgb>,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn from_pixels(pixels: Vec<Rgb>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for p in &pixels {
            for (c, v) in p.to_bytes().into_iter().enumerate() {
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
        }
        Self { pixels, min, max }
    }

    fn range(&self, channel: usize) -> u8 {
        self.max[channel] - self.min[channel]
    }

    fn volume(&self) -> u32 {
        (0..3).map(|c| self.range(c) as u32 + 1).product()
    }

    fn is_splittable(&self) -> bool {
        self.pixels.len() > 1 && (0..3).any(|c| self.range(c) > 0)
    }

    /// Channel with the widest range; red wins ties, then green.
    fn widest_channel(&self) -> usize {
        let (r, g, b) = (self.range(0), self.range(1), self.range(2));
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    /// Split at the median of the widest channel. Both halves are non-empty.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();
        self.pixels.sort_by_key(|p| p.to_bytes()[channel]);
        let upper = self.pixels.split_off(self.pixels.len() / 2);
        (ColorBox::from_pixels(self.pixels), ColorBox::from_pixels(upper))
    }

    /// Truncating per-channel mean.
    fn average(&self) -> Rgb {
        let count = self.pixels.len() as u64;
        if count == 0 {
            return Rgb::BLACK;
        }
        let mut sum = [0u64; 3];
        for p in &self.pixels {
            for (c, v) in p.to_bytes().into_iter().enumerate() {
                sum[c] += v as u64;
            }
        }
        Rgb::new(
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        )
    }
}

/// Reduce `pixels` to at most `max_colors` representative colors.
///
/// The splittable box with the most pixels is split first; ties go to the
/// larger volume, then to the earlier box. Returns fewer colors when the
/// input runs out of distinct values, and an empty list for empty input.
pub fn median_cut(pixels: &[Rgb], max_colors: usize) -> Vec<Rgb> {
    if pixels.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut boxes = vec![ColorBox::from_pixels(pixels.to_vec())];

    while boxes.len() < max_colors {
        let mut best: Option<usize> = None;
        for (i, candidate) in boxes.iter().enumerate() {
            if !candidate.is_splittable() {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    let current = &boxes[b];
                    (candidate.pixels.len(), candidate.volume())
                        > (current.pixels.len(), current.volume())
                }
            };
            if better {
                best = Some(i);
            }
        }

        let Some(idx) = best else {
            break;
        };
        let (lower, upper) = boxes.remove(idx).split();
        boxes.insert(idx, upper);
        boxes.insert(idx, lower);
    }

    boxes.iter().map(ColorBox::average).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn test_empty_input() {
        assert!(median_cut(&[], 4).is_empty());
        assert!(median_cut(&[RED], 0).is_empty());
    }

    #[test]
    fn test_uniform_image_yields_single_color() {
        let pixels = vec![Rgb::new(12, 34, 56); 25];
        assert_eq!(median_cut(&pixels, 8), vec![Rgb::new(12, 34, 56)]);
    }

    #[test]
    fn test_single_color_budget_is_truncating_mean() {
        let pixels = [Rgb::new(0, 0, 0), Rgb::new(1, 3, 255)];
        assert_eq!(median_cut(&pixels, 1), vec![Rgb::new(0, 1, 127)]);
    }

    #[test]
    fn test_separates_primary_blocks() {
        let mut pixels = Vec::new();
        for color in [RED, GREEN, BLUE, Rgb::WHITE] {
            pixels.extend(std::iter::repeat(color).take(4));
        }
        let colors = median_cut(&pixels, 4);
        assert_eq!(colors.len(), 4);
        let set: HashSet<Rgb> = colors.into_iter().collect();
        assert_eq!(set, HashSet::from([RED, GREEN, BLUE, Rgb::WHITE]));
    }

    #[test]
    fn test_budget_above_distinct_count_returns_fewer() {
        let pixels = [RED, GREEN, RED, GREEN, RED];
        let colors = median_cut(&pixels, 16);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_never_exceeds_budget() {
        let pixels: Vec<Rgb> = (0..=255u8).map(|v| Rgb::new(v, 255 - v, v / 2)).collect();
        for budget in [1, 2, 3, 7, 64, 256] {
            let colors = median_cut(&pixels, budget);
            assert!(colors.len() <= budget);
            assert!(!colors.is_empty());
        }
    }

    #[test]
    fn test_uniform_box_is_not_split() {
        // The all-black half cannot be split, so the remaining budget goes
        // to the mixed half.
        let mut pixels = vec![Rgb::new(0, 0, 0); 5];
        pixels.extend(vec![Rgb::new(10, 0, 0); 4]);
        pixels.push(Rgb::new(250, 0, 0));
        let colors = median_cut(&pixels, 3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], Rgb::new(0, 0, 0));
        assert_eq!(colors[1], Rgb::new(10, 0, 0));
        assert_eq!(colors[2], Rgb::new(90, 0, 0));
    }
}
