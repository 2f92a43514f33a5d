/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses exactly `#RRGGBB` (the `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid hex color `{s}`, expected #RRGGBB"));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|e| format!("invalid hex color `{s}`: {e}"));
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Case-insensitive lookup in the closed palette.
    pub fn named(name: &str) -> Option<Self> {
        let hex = match name.to_ascii_lowercase().as_str() {
            "black"       => return Some(Color::BLACK),
            "white"       => return Some(Color::WHITE),
            "red"         => return Some(Color::rgb(255, 0, 0)),
            "green"       => return Some(Color::rgb(0, 255, 0)),
            "blue"        => return Some(Color::rgb(0, 0, 255)),
            "yellow"      => return Some(Color::rgb(255, 255, 0)),
            "cyan"        => return Some(Color::rgb(0, 255, 255)),
            "magenta"     => return Some(Color::rgb(255, 0, 255)),

            // material
            "primary"     => "2196F3",
            "secondary"   => "FF9800",
            "accent"      => "FF5722",
            "background"  => "FAFAFA",
            "surface"     => "FFFFFF",
            "error"       => "F44336",
            "success"     => "4CAF50",
            "warning"     => "FFC107",
            "info"        => "2196F3",
            "muted"       => "9E9E9E",

            // math
            "mathred"     => "E74C3C",
            "mathblue"    => "3498DB",
            "mathgreen"   => "27AE60",
            "mathorange"  => "F39C12",
            "mathpurple"  => "8E44AD",

            // deep palette
            "deepblue"    => "051B4A",
            "midblue"     => "274274",
            "purpleblue"  => "576DA2",
            "cyanblue"    => "2B576E",
            "darkcolor"   => "041229",
            "lightpurple" => "9BA2C2",
            _ => return None,
        };
        Color::from_hex(hex).ok()
    }

    /// A `#`-prefixed string is hex, anything else a palette name.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.starts_with('#') {
            Color::from_hex(s)
        } else {
            Color::named(s).ok_or_else(|| format!("unknown color `{s}`"))
        }
    }

    /// Per-channel interpolation, rounded and clamped.
    pub fn lerp(self, to: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Color { r: mix(self.r, to.r), g: mix(self.g, to.g), b: mix(self.b, to.b), a: mix(self.a, to.a) }
    }
}

impl Default for Color {
    fn default() -> Self { Color::BLACK }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#FF0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("2196f3"), Ok(Color::rgb(0x21, 0x96, 0xF3)));
    }

    #[test]
    fn hex_must_be_six_digits() {
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#FF000080").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn named_is_case_insensitive() {
        assert_eq!(Color::named("Red"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::named("MATHBLUE"), Some(Color::rgb(0x34, 0x98, 0xDB)));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn parse_never_defaults() {
        assert!(Color::parse("nope").unwrap_err().contains("nope"));
        assert_eq!(Color::parse("#00FF00"), Ok(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn lerp_rounds_channels() {
        let c = Color::BLACK.lerp(Color::rgb(255, 100, 1), 0.5);
        assert_eq!(c, Color::rgb(128, 50, 1));
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Color::rgb(255, 8, 0).to_string(), "#FF0800");
    }
}
