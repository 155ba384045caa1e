//! Built-in 3x5 digit glyphs used when no label font is installed.

/// Glyph width in font units.
pub const GLYPH_WIDTH: u32 = 3;
/// Glyph height in font units.
pub const GLYPH_HEIGHT: u32 = 5;

/// Rows top to bottom; bit 2 is the leftmost column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Row masks for `c`, or `None` for anything but an ASCII digit.
pub fn glyph(c: char) -> Option<&'static [u8; 5]> {
    c.to_digit(10).map(|d| &DIGITS[d as usize])
}

/// Whether the font unit at (`col`, `row`) of a glyph is inked.
#[inline]
pub fn is_set(rows: &[u8; 5], col: u32, row: u32) -> bool {
    rows[row as usize] & (1 << (GLYPH_WIDTH - 1 - col)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_digits_have_glyphs() {
        for c in '0'..='9' {
            assert!(glyph(c).is_some());
        }
        assert!(glyph('a').is_none());
        assert!(glyph('-').is_none());
    }

    #[test]
    fn test_one_is_a_centre_stroke() {
        let one = glyph('1').unwrap();
        assert!(is_set(one, 1, 0));
        assert!(!is_set(one, 0, 0));
        assert!(!is_set(one, 2, 0));
        assert!((0..3).all(|col| is_set(one, col, 4)));
    }

    #[test]
    fn test_eight_differs_from_zero_in_middle_row_only() {
        let zero = glyph('0').unwrap();
        let eight = glyph('8').unwrap();
        for row in 0..GLYPH_HEIGHT {
            let same = (0..GLYPH_WIDTH).all(|c| is_set(zero, c, row) == is_set(eight, c, row));
            assert_eq!(same, row != 2, "row {row}");
        }
    }
}
