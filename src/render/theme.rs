//! Visual Themes
//!
//! Three named themes share colours across both output media; fonts and
//! sizes differ per medium. Unknown style names fall back to `default`.

use std::fmt;

use crate::types::OutputFormat;

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Channels scaled to 0.0..=1.0
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Uppercase `RRGGBB`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleName {
    #[default]
    Default,
    Dark,
    Creative,
}

impl StyleName {
    /// Exact, case-sensitive lookup; anything unrecognised is `Default`
    pub fn resolve(name: &str) -> Self {
        match name {
            "dark" => Self::Dark,
            "creative" => Self::Creative,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Creative => "creative",
        }
    }
}

/// Output medium, which decides fonts and absolute sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Document,
    Deck,
}

impl From<OutputFormat> for Medium {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Document => Medium::Document,
            OutputFormat::Deck => Medium::Deck,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub style: StyleName,
    pub background: Rgb,
    pub title_color: Rgb,
    pub text_color: Rgb,
    pub accent: Rgb,
    pub font: &'static str,
    pub title_size: f32,
    pub subtitle_size: f32,
    pub header_size: f32,
    pub body_size: f32,
    /// Titles and headers drawn bold
    pub bold_titles: bool,
}

struct Palette {
    background: u32,
    title: u32,
    text: u32,
    accent: u32,
}

const fn palette(style: StyleName) -> Palette {
    match style {
        StyleName::Default => Palette {
            background: 0xFFFFFF,
            title: 0x333333,
            text: 0x666666,
            accent: 0x4472C4,
        },
        StyleName::Dark => Palette {
            background: 0x2F3437,
            title: 0xFFFFFF,
            text: 0xE1E1E1,
            accent: 0x3498DB,
        },
        StyleName::Creative => Palette {
            background: 0xF5F5F5,
            title: 0x1E88E5,
            text: 0x424242,
            accent: 0xFF5722,
        },
    }
}

impl Theme {
    pub fn resolve(style: &str, medium: Medium) -> Self {
        Self::named(StyleName::resolve(style), medium)
    }

    pub fn named(style: StyleName, medium: Medium) -> Self {
        let colors = palette(style);

        let (font, title_size, subtitle_size, header_size, body_size, bold_titles) = match medium {
            Medium::Document => ("Helvetica", 36.0, 24.0, 28.0, 16.0, false),
            Medium::Deck => {
                let font = match style {
                    StyleName::Default => "Arial",
                    StyleName::Dark => "Calibri",
                    StyleName::Creative => "Verdana",
                };
                (font, 44.0, 32.0, 28.0, 18.0, true)
            }
        };

        Self {
            style,
            background: Rgb::from_hex(colors.background),
            title_color: Rgb::from_hex(colors.title),
            text_color: Rgb::from_hex(colors.text),
            accent: Rgb::from_hex(colors.accent),
            font,
            title_size,
            subtitle_size,
            header_size,
            body_size,
            bold_titles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_resolves() {
        let theme = Theme::resolve("dark", Medium::Document);
        assert_eq!(theme.style, StyleName::Dark);
        assert_eq!(theme.background, Rgb(0x2F, 0x34, 0x37));
        assert_eq!(theme.title_color.to_string(), "FFFFFF");
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        for medium in [Medium::Document, Medium::Deck] {
            assert_eq!(
                Theme::resolve("nonexistent", medium),
                Theme::named(StyleName::Default, medium)
            );
        }
        assert_eq!(StyleName::resolve("creative"), StyleName::Creative);
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(StyleName::resolve("dark"), StyleName::Dark);
        for name in ["Dark", "DARK", " dark", "dark ", "  CREATIVE "] {
            assert_eq!(StyleName::resolve(name), StyleName::Default, "{name:?}");
        }
    }

    #[test]
    fn test_media_share_colours_not_sizes() {
        let doc = Theme::resolve("creative", Medium::Document);
        let deck = Theme::resolve("creative", Medium::Deck);

        assert_eq!(doc.accent, deck.accent);
        assert_eq!(doc.accent.to_string(), "FF5722");
        assert_eq!(doc.font, "Helvetica");
        assert_eq!(deck.font, "Verdana");
        assert_eq!((doc.title_size, deck.title_size), (36.0, 44.0));
        assert_eq!((doc.body_size, deck.body_size), (16.0, 18.0));
    }

    #[test]
    fn test_rgb_unit() {
        let (r, g, b) = Rgb::from_hex(0xFF0000).unit();
        assert_eq!((r, g, b), (1.0, 0.0, 0.0));
    }
}
