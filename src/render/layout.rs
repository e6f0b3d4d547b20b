//! Slide Layout
//!
//! Medium-independent placement of slide content. Positions are points with
//! a top-left origin; a `TextBox` `y` is the top of its first line.
//!
//! - Title slide: title centred horizontally, top edge at `height/2 - title_size`;
//!   subtitle centred at `height/2 + title_size/2`
//! - Content slide: header at the top-left margin, bullets from
//!   `margin + header height + HEADER_GAP`, each advancing by
//!   `body + BULLET_SPACING` plus one line height per wrapped line

use crate::constants::layout::{
    BULLET_SPACING, BULLET_TEXT_INDENT, DECK_HEIGHT, DECK_MARGIN, DECK_WIDTH, DOCUMENT_HEIGHT,
    DOCUMENT_MARGIN, DOCUMENT_WIDTH, FALLBACK_GLYPH_WIDTH, HEADER_GAP, LINE_HEIGHT, MARKER_OFFSET,
    MARKER_RADIUS,
};
use crate::render::theme::{Rgb, Theme};
use crate::types::{Result, Slide, SlideKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 landscape
    pub const fn document() -> Self {
        Self {
            width: DOCUMENT_WIDTH,
            height: DOCUMENT_HEIGHT,
            margin: DOCUMENT_MARGIN,
        }
    }

    /// 16:9 slide
    pub const fn deck() -> Self {
        Self {
            width: DECK_WIDTH,
            height: DECK_HEIGHT,
            margin: DECK_MARGIN,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Pre-wrapped lines
    pub lines: Vec<String>,
    pub size: f32,
    pub color: Rgb,
    pub bold: bool,
    pub align: Align,
}

impl TextBox {
    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }

    /// First line is `size` tall; each further line adds a line height
    pub fn height(&self) -> f32 {
        let extra = self.lines.len().saturating_sub(1) as f32;
        self.size + extra * self.line_height()
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Filled circle bullet marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(TextBox),
    Bullet { marker: Marker, text: TextBox },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlidePlan {
    pub kind: SlideKind,
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl SlidePlan {
    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.primitives.iter().map(|p| match p {
            Primitive::Text(text) => text,
            Primitive::Bullet { text, .. } => text,
        })
    }
}

/// Low-level drawing backend for one output format
pub trait Surface {
    fn begin_slide(&mut self, plan: &SlidePlan) -> Result<()>;

    fn draw_text(&mut self, text: &TextBox) -> Result<()>;

    fn draw_bullet(&mut self, marker: &Marker, text: &TextBox) -> Result<()>;

    fn end_slide(&mut self) -> Result<()>;

    fn finish(self) -> Result<Vec<u8>>;
}

/// Lay out every slide and feed the plans to `surface`
pub fn draw_slides<S: Surface>(
    mut surface: S,
    slides: &[Slide],
    theme: &Theme,
    geometry: &PageGeometry,
) -> Result<Vec<u8>> {
    for slide in slides {
        let plan = plan_slide(slide, theme, geometry);
        surface.begin_slide(&plan)?;
        for primitive in &plan.primitives {
            match primitive {
                Primitive::Text(text) => surface.draw_text(text)?,
                Primitive::Bullet { marker, text } => surface.draw_bullet(marker, text)?,
            }
        }
        surface.end_slide()?;
    }
    surface.finish()
}

pub fn plan_slide(slide: &Slide, theme: &Theme, geometry: &PageGeometry) -> SlidePlan {
    let primitives = match slide.kind {
        SlideKind::Title => plan_title(slide, theme, geometry),
        SlideKind::Content => plan_content(slide, theme, geometry),
    };

    SlidePlan {
        kind: slide.kind,
        background: theme.background,
        primitives,
    }
}

fn plan_title(slide: &Slide, theme: &Theme, geometry: &PageGeometry) -> Vec<Primitive> {
    let mid = geometry.height / 2.0;
    let width = geometry.content_width();
    let mut primitives = vec![Primitive::Text(TextBox {
        x: geometry.margin,
        y: mid - theme.title_size,
        width,
        lines: wrap_text(&slide.title, theme.title_size, width),
        size: theme.title_size,
        color: theme.title_color,
        bold: theme.bold_titles,
        align: Align::Center,
    })];

    if let Some(subtitle) = slide.subtitle.as_deref().filter(|s| !s.is_empty()) {
        primitives.push(Primitive::Text(TextBox {
            x: geometry.margin,
            y: mid + theme.title_size / 2.0,
            width,
            lines: wrap_text(subtitle, theme.subtitle_size, width),
            size: theme.subtitle_size,
            color: theme.text_color,
            bold: false,
            align: Align::Center,
        }));
    }

    primitives
}

fn plan_content(slide: &Slide, theme: &Theme, geometry: &PageGeometry) -> Vec<Primitive> {
    let margin = geometry.margin;
    let header = TextBox {
        x: margin,
        y: margin,
        width: geometry.content_width(),
        lines: wrap_text(&slide.title, theme.header_size, geometry.content_width()),
        size: theme.header_size,
        color: theme.title_color,
        bold: theme.bold_titles,
        align: Align::Left,
    };

    let mut y = margin + header.height() + HEADER_GAP;
    let mut primitives = vec![Primitive::Text(header)];

    let text_width = geometry.content_width() - BULLET_TEXT_INDENT;
    for bullet in slide.bullets() {
        let text = TextBox {
            x: margin + BULLET_TEXT_INDENT,
            y,
            width: text_width,
            lines: wrap_text(bullet, theme.body_size, text_width),
            size: theme.body_size,
            color: theme.text_color,
            bold: false,
            align: Align::Left,
        };
        let marker = Marker {
            cx: margin + MARKER_OFFSET,
            cy: y + theme.body_size / 3.0,
            radius: MARKER_RADIUS,
            color: theme.text_color,
        };

        let extra_lines = text.lines.len().saturating_sub(1) as f32;
        y += theme.body_size + BULLET_SPACING + extra_lines * text.line_height();
        primitives.push(Primitive::Bullet { marker, text });
    }

    primitives
}

// =============================================================================
// Text Metrics
// =============================================================================

/// Helvetica advance widths for ' '..='~', in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn glyph_width(c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[(code - 0x20) as usize]
    } else {
        FALLBACK_GLYPH_WIDTH
    }
}

/// Estimated rendered width in points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. Words wider than the line are split by character.
/// Always returns at least one line.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                let mut next = current.clone();
                next.push(c);
                if !current.is_empty() && text_width(&next, size) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                } else {
                    current = next;
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::Medium;

    fn document_theme() -> Theme {
        Theme::resolve("default", Medium::Document)
    }

    #[test]
    fn test_title_slide_centered_mid_page() {
        let geometry = PageGeometry::document();
        let theme = document_theme();
        let plan = plan_slide(&Slide::title("Climate").with_subtitle("Now"), &theme, &geometry);

        let boxes: Vec<&TextBox> = plan.text_boxes().collect();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].align, Align::Center);
        assert_eq!(boxes[0].y, geometry.height / 2.0 - 36.0);
        assert_eq!(boxes[1].y, geometry.height / 2.0 + 18.0);
        assert_eq!(boxes[1].size, 24.0);
        assert_eq!(boxes[1].color, theme.text_color);
    }

    #[test]
    fn test_content_bullet_positions() {
        let geometry = PageGeometry::document();
        let theme = document_theme();
        let slide = Slide::content("Facts", vec!["One".to_string(), "Two".to_string()]);
        let plan = plan_slide(&slide, &theme, &geometry);

        assert_eq!(plan.primitives.len(), 3);
        let Primitive::Text(header) = &plan.primitives[0] else {
            panic!("header first");
        };
        assert_eq!((header.x, header.y), (40.0, 40.0));

        let positions: Vec<(f32, f32, f32)> = plan.primitives[1..]
            .iter()
            .map(|p| match p {
                Primitive::Bullet { marker, text } => (marker.cx, marker.cy, text.y),
                Primitive::Text(_) => panic!("expected bullet"),
            })
            .collect();

        // 40 + 28 + 20, then + 16 + 12
        assert_eq!(positions[0], (46.0, 88.0 + 16.0 / 3.0, 88.0));
        assert_eq!(positions[1].2, 116.0);
    }

    #[test]
    fn test_wrapped_bullet_pushes_next_down() {
        let geometry = PageGeometry::document();
        let theme = document_theme();
        let long = "word ".repeat(80);
        let slide = Slide::content("H", vec![long, "after".to_string()]);
        let plan = plan_slide(&slide, &theme, &geometry);

        let (first, second) = match (&plan.primitives[1], &plan.primitives[2]) {
            (Primitive::Bullet { text: a, .. }, Primitive::Bullet { text: b, .. }) => (a, b),
            _ => panic!("expected bullets"),
        };
        let extra = (first.lines.len() - 1) as f32;
        assert!(extra >= 1.0);
        let expected = first.y + 16.0 + 12.0 + extra * first.line_height();
        assert!((second.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_missing_subtitle_and_bullets() {
        let geometry = PageGeometry::deck();
        let theme = Theme::resolve("dark", Medium::Deck);

        assert_eq!(plan_slide(&Slide::title("Only"), &theme, &geometry).primitives.len(), 1);
        let empty = Slide::content("Header", vec![]);
        assert_eq!(plan_slide(&empty, &theme, &geometry).primitives.len(), 1);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 12.0, 100.0), vec![String::new()]);
        assert_eq!(wrap_text("a b", 12.0, 1000.0), vec!["a b".to_string()]);

        let lines = wrap_text("alpha beta gamma delta", 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");

        let split = wrap_text("WWWWWWWWWW", 10.0, 30.0);
        assert!(split.len() > 1);
        assert_eq!(split.concat(), "WWWWWWWWWW");
    }

    #[test]
    fn test_text_width_uses_metrics() {
        assert_eq!(text_width("i", 1000.0), 222.0);
        assert_eq!(text_width("W", 10.0), 9.44);
        assert_eq!(text_width("ж", 1000.0), 556.0);
    }
}
