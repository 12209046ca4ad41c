//! Text colour parsing.

/// An sRGB colour with components in 0.0–1.0, as PDF fill operators expect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses `#RRGGBB` or `#RGB` (the `#` is optional). Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let (r, g, b) = match digits.len() {
            6 => (
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            ),
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                (nibble(0).ok()?, nibble(1).ok()?, nibble(2).ok()?)
            }
            _ => return None,
        };

        Some(Rgb {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_hex() {
        let c = Rgb::from_hex("#FF8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_short_hex_expands() {
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb { r: 1.0, g: 1.0, b: 1.0 }));
        assert_eq!(Rgb::from_hex("000"), Some(Rgb::BLACK));
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert_eq!(Rgb::from_hex("navy"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert_eq!(Rgb::from_hex(""), None);
    }
}
