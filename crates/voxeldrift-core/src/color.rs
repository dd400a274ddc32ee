//! Voxel colors
//!
//! Colors are stored as f32 RGB triples in [0, 1]. The matcher
//! compares them with a luma-weighted distance and the loader perturbs their
//! HSL lightness so flat regions get some texture.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RGB color with channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for VoxelColor {
    fn default() -> Self {
        Self::DEFAULT_GRAY
    }
}

impl VoxelColor {
    /// Fallback for colors that cannot be parsed (0x888888)
    pub const DEFAULT_GRAY: VoxelColor = VoxelColor::from_packed(0x888888);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a 24-bit `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_packed(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f32 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f32 / 255.0,
            b: (rgb & 0xFF) as f32 / 255.0,
        }
    }

    /// Pack into a 24-bit `0xRRGGBB` value, rounding each channel
    pub fn to_packed(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// `#RRGGBB` with uppercase hex digits
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.to_packed())
    }

    /// Parse `#RRGGBB`, `0xRRGGBB` or bare `RRGGBB`
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        u32::from_str_radix(digits, 16).ok().map(Self::from_packed)
    }

    /// Interpret a decimal number as a packed color
    ///
    /// Non-finite, negative or > 0xFFFFFF values yield `None`. Fractions are truncated.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || !(0.0..=16_777_215.0).contains(&value) {
            return None;
        }
        Some(Self::from_packed(value.trunc() as u32))
    }

    /// Luma-weighted Euclidean distance used as the matching cost
    pub fn perceptual_distance(self, other: VoxelColor) -> f32 {
        let dr = 0.3 * (self.r - other.r);
        let dg = 0.59 * (self.g - other.g);
        let db = 0.11 * (self.b - other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Foliage/wood class: greenish, or dark in both red and blue
    pub fn is_organic(self) -> bool {
        self.g > 0.4 || (self.r < 0.25 && self.b < 0.25)
    }

    /// Shift HSL lightness by `delta`, keeping hue and saturation
    pub fn offset_lightness(self, delta: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l + delta).clamp(0.0, 1.0))
    }

    /// Hue, saturation and lightness, each in [0, 1]
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let lightness = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, lightness);
        }

        let delta = max - min;
        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let hue = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        (hue / 6.0, saturation, lightness)
    }

    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        if saturation == 0.0 {
            return Self::new(lightness, lightness, lightness);
        }

        let high = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let low = 2.0 * lightness - high;

        Self::new(
            hue_to_channel(low, high, hue + 1.0 / 3.0),
            hue_to_channel(low, high, hue),
            hue_to_channel(low, high, hue - 1.0 / 3.0),
        )
    }
}

fn hue_to_channel(low: f32, high: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

/// Coerce an arbitrary JSON value into a color
///
/// Strings: `#RRGGBB`, `0xRRGGBB`, six bare hex digits, or a decimal integer.
/// Numbers: decimal packed value. Anything else becomes [`VoxelColor::DEFAULT_GRAY`].
pub fn parse_color(value: &Value) -> VoxelColor {
    let parsed = match value {
        Value::String(s) => VoxelColor::from_hex(s).or_else(|| {
            s.trim()
                .parse::<f64>()
                .ok()
                .and_then(VoxelColor::from_decimal)
        }),
        Value::Number(n) => n.as_f64().and_then(VoxelColor::from_decimal),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::trace!("Unparseable color {}, using default gray", value);
        VoxelColor::DEFAULT_GRAY
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx(a: VoxelColor, b: VoxelColor) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_packed_round_trip() {
        for rgb in [0x000000, 0xFFFFFF, 0xFF0000, 0x12AB9C, 0x888888] {
            assert_eq!(VoxelColor::from_packed(rgb).to_packed(), rgb);
        }
    }

    #[test]
    fn test_hex_formats() {
        let expected = VoxelColor::from_packed(0x3A7F12);
        assert_eq!(VoxelColor::from_hex("#3A7F12"), Some(expected));
        assert_eq!(VoxelColor::from_hex("3a7f12"), Some(expected));
        assert_eq!(VoxelColor::from_hex("0x3A7F12"), Some(expected));
        assert_eq!(VoxelColor::from_hex("#3A7F1"), None);
        assert_eq!(VoxelColor::from_hex("#GGGGGG"), None);
        assert_eq!(expected.to_hex(), "#3A7F12");
    }

    #[test]
    fn test_parse_color_coercion() {
        assert_eq!(parse_color(&json!("#FF0000")).to_packed(), 0xFF0000);
        assert_eq!(parse_color(&json!("00FF00")).to_packed(), 0x00FF00);
        assert_eq!(parse_color(&json!(255)).to_packed(), 0x0000FF);
        assert_eq!(parse_color(&json!("16711680")).to_packed(), 0xFF0000);

        // Garbage falls back to gray instead of failing
        assert_eq!(parse_color(&json!("banana")), VoxelColor::DEFAULT_GRAY);
        assert_eq!(parse_color(&json!(-1)), VoxelColor::DEFAULT_GRAY);
        assert_eq!(parse_color(&json!(1e12)), VoxelColor::DEFAULT_GRAY);
        assert_eq!(parse_color(&json!(null)), VoxelColor::DEFAULT_GRAY);
        assert_eq!(parse_color(&json!([1, 2, 3])), VoxelColor::DEFAULT_GRAY);
    }

    #[test]
    fn test_perceptual_distance() {
        let red = VoxelColor::from_packed(0xFF0000);
        let green = VoxelColor::from_packed(0x00FF00);
        let blue = VoxelColor::from_packed(0x0000FF);

        assert_eq!(red.perceptual_distance(red), 0.0);
        // Green differences weigh the most, blue the least
        assert!(red.perceptual_distance(green) > red.perceptual_distance(blue));
        assert!((red.perceptual_distance(blue) - (0.09f32 + 0.0121).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_organic_classification() {
        assert!(VoxelColor::from_packed(0x2E8B22).is_organic()); // leaf green
        assert!(VoxelColor::from_packed(0x3B2A10).is_organic()); // dark bark
        assert!(!VoxelColor::from_packed(0xFF0000).is_organic());
        assert!(!VoxelColor::from_packed(0x0000FF).is_organic());
        assert!(!VoxelColor::from_packed(0x993333).is_organic());
        // Light grays count as organic because of the green threshold
        assert!(VoxelColor::from_packed(0xCCCCCC).is_organic());
    }

    #[test]
    fn test_hsl_round_trip() {
        for rgb in [0xFF0000, 0x00FF00, 0x0000FF, 0x3A7F12, 0xCCCCCC, 0xFFA500] {
            let color = VoxelColor::from_packed(rgb);
            let (h, s, l) = color.to_hsl();
            assert!(approx(VoxelColor::from_hsl(h, s, l), color), "{:06X}", rgb);
        }
    }

    #[test]
    fn test_offset_lightness() {
        let gray = VoxelColor::from_packed(0x808080);
        let lighter = gray.offset_lightness(0.05);
        let darker = gray.offset_lightness(-0.05);
        assert!(lighter.r > gray.r && darker.r < gray.r);

        // Hue survives the shift
        let orange = VoxelColor::from_packed(0xFFA500);
        let (h0, _, _) = orange.to_hsl();
        let (h1, _, _) = orange.offset_lightness(-0.05).to_hsl();
        assert!((h0 - h1).abs() < 1e-3);

        // Clamped at white
        assert!(approx(
            VoxelColor::from_packed(0xFFFFFF).offset_lightness(0.05),
            VoxelColor::new(1.0, 1.0, 1.0)
        ));
    }
}
