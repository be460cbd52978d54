use super::ValidationError;

/// Text color used on light backgrounds and for malformed input.
pub const DARK_TEXT: &str = "#000000";

/// Text color used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// Notion's named colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    LightGray,
    LightBrown,
    LightRed,
    LightOrange,
    LightYellow,
    LightGreen,
    LightBlue,
    LightPurple,
    LightPink,
}

impl std::str::FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Color::Default),
            "gray" => Ok(Color::Gray),
            "brown" => Ok(Color::Brown),
            "red" => Ok(Color::Red),
            "orange" => Ok(Color::Orange),
            "yellow" => Ok(Color::Yellow),
            "green" => Ok(Color::Green),
            "blue" => Ok(Color::Blue),
            "purple" => Ok(Color::Purple),
            "pink" => Ok(Color::Pink),
            "gray_background" | "light_gray" => Ok(Color::LightGray),
            "brown_background" | "light_brown" => Ok(Color::LightBrown),
            "red_background" | "light_red" => Ok(Color::LightRed),
            "orange_background" | "light_orange" => Ok(Color::LightOrange),
            "yellow_background" | "light_yellow" => Ok(Color::LightYellow),
            "green_background" | "light_green" => Ok(Color::LightGreen),
            "blue_background" | "light_blue" => Ok(Color::LightBlue),
            "purple_background" | "light_purple" => Ok(Color::LightPurple),
            "pink_background" | "light_pink" => Ok(Color::LightPink),
            _ => Err(ValidationError::InvalidColor(s.to_string())),
        }
    }
}

impl Color {
    /// Resolves a Notion color name, falling back to [`Color::Default`].
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Approximate hex value of the color as Notion paints it.
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Default => "#E3E2E0",
            Color::Gray => "#9B9A97",
            Color::Brown => "#64473A",
            Color::Orange => "#D9730D",
            Color::Yellow => "#DFAB01",
            Color::Green => "#0F7B6C",
            Color::Blue => "#0B6E99",
            Color::Purple => "#6940A5",
            Color::Pink => "#AD1A72",
            Color::Red => "#D44C47",
            Color::LightGray => "#F1F1EF",
            Color::LightBrown => "#F3EEEE",
            Color::LightOrange => "#FAEBDD",
            Color::LightYellow => "#FBF3DB",
            Color::LightGreen => "#EDF3F3",
            Color::LightBlue => "#E7F0F4",
            Color::LightPurple => "#F0F0F7",
            Color::LightPink => "#F8E7F3",
            Color::LightRed => "#FAECEC",
        }
    }

    /// Text color that stays readable on top of this color.
    pub fn contrast_text(&self) -> &'static str {
        text_color_for_background(self.hex())
    }
}

/// Picks black or white text for a `#RRGGBB` background.
///
/// Relative luminance is `(0.299 R + 0.587 G + 0.114 B) / 255`; anything
/// above 0.5 gets black text. Input that is not exactly `#RRGGBB` gets black.
pub fn text_color_for_background(hex: &str) -> &'static str {
    match parse_hex_rgb(hex) {
        Some((r, g, b)) => {
            let luminance =
                (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
            if luminance > 0.5 {
                DARK_TEXT
            } else {
                LIGHT_TEXT
            }
        }
        None => DARK_TEXT,
    }
}

fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::from_str("red").unwrap(), Color::Red);
        assert_eq!(
            Color::from_str("gray_background").unwrap(),
            Color::LightGray
        );
        assert_eq!(Color::from_str("light_gray").unwrap(), Color::LightGray);
        assert!(Color::from_str("invalid").is_err());
    }

    #[test]
    fn test_unknown_names_fall_back_to_default() {
        assert_eq!(Color::from_name_lossy("chartreuse"), Color::Default);
        assert_eq!(Color::from_name_lossy("chartreuse").hex(), "#E3E2E0");
        assert_eq!(Color::from_name_lossy("blue").hex(), "#0B6E99");
    }

    #[test]
    fn test_contrast_against_palette() {
        assert_eq!(Color::Default.contrast_text(), DARK_TEXT);
        assert_eq!(Color::Yellow.contrast_text(), DARK_TEXT);
        assert_eq!(Color::Green.contrast_text(), LIGHT_TEXT);
        assert_eq!(Color::Red.contrast_text(), LIGHT_TEXT);
        assert_eq!(Color::LightBlue.contrast_text(), DARK_TEXT);
    }

    #[test]
    fn test_contrast_extremes() {
        assert_eq!(text_color_for_background("#FFFFFF"), DARK_TEXT);
        assert_eq!(text_color_for_background("#000000"), LIGHT_TEXT);
        assert_eq!(text_color_for_background("#ffffff"), DARK_TEXT);
    }

    #[test]
    fn test_malformed_hex_gets_dark_text() {
        for input in ["", "#", "FFFFFF", "#FFF", "#GGGGGG", "#0000000", "#12345é"] {
            assert_eq!(text_color_for_background(input), DARK_TEXT, "{input:?}");
        }
    }
}
