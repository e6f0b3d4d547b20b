//! PDF Backend
//!
//! Writes a PDF 1.4 file directly: one page per slide, Type1 base fonts with
//! WinAnsi encoding (regular as `/F1`, bold as `/F2`) and uncompressed
//! content streams. Characters outside Latin-1 are drawn as `?`.
//!
//! ## Object layout
//!
//! | id        | object                  |
//! |-----------|-------------------------|
//! | 1         | Catalog                 |
//! | 2         | Pages                   |
//! | 3, 4      | regular and bold fonts  |
//! | 5         | Info dictionary         |
//! | 6 + 2i    | page `i`                |
//! | 7 + 2i    | content stream of `i`   |

use std::fmt::Write as _;

use super::layout::{Align, Marker, PageGeometry, SlidePlan, Surface, TextBox, text_width};
use super::theme::Rgb;
use crate::constants::artifact::AUTHOR;
use crate::constants::layout::TEXT_ASCENT;
use crate::types::Result;

const FIRST_PAGE_ID: usize = 6;

/// Bezier control distance for a quarter circle
const KAPPA: f32 = 0.552_284_8;

pub struct PdfSurface {
    geometry: PageGeometry,
    font: String,
    title: String,
    subject: String,
    pages: Vec<String>,
    current: String,
}

impl PdfSurface {
    pub fn new(geometry: PageGeometry, font: &str, title: &str, subject: &str) -> Self {
        Self {
            geometry,
            font: font.to_string(),
            title: title.to_string(),
            subject: subject.to_string(),
            pages: Vec::new(),
            current: String::new(),
        }
    }

    /// Convert a top-left y to PDF's bottom-left space
    fn flip(&self, y: f32) -> f32 {
        self.geometry.height - y
    }

    fn set_fill(&mut self, color: Rgb) {
        let (r, g, b) = color.unit();
        let _ = writeln!(self.current, "{:.3} {:.3} {:.3} rg", r, g, b);
    }
}

impl Surface for PdfSurface {
    fn begin_slide(&mut self, plan: &SlidePlan) -> Result<()> {
        self.current.clear();
        self.set_fill(plan.background);
        let _ = writeln!(
            self.current,
            "0 0 {:.2} {:.2} re\nf",
            self.geometry.width, self.geometry.height
        );
        Ok(())
    }

    fn draw_text(&mut self, text: &TextBox) -> Result<()> {
        let font = if text.bold { "F2" } else { "F1" };
        self.set_fill(text.color);

        for (i, line) in text.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let top = text.y + TEXT_ASCENT * text.size + i as f32 * text.line_height();
            let x = match text.align {
                Align::Left => text.x,
                Align::Center => text.x + (text.width - text_width(line, text.size)).max(0.0) / 2.0,
            };
            let y = self.flip(top);
            let _ = writeln!(
                self.current,
                "BT /{} {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
                font,
                text.size,
                x,
                y,
                encode_text(line)
            );
        }
        Ok(())
    }

    fn draw_bullet(&mut self, marker: &Marker, text: &TextBox) -> Result<()> {
        self.set_fill(marker.color);

        let (cx, cy, r) = (marker.cx, self.flip(marker.cy), marker.radius);
        let k = KAPPA * r;
        let _ = writeln!(
            self.current,
            "{x1:.2} {cy:.2} m\n\
             {x1:.2} {a:.2} {b:.2} {y1:.2} {cx:.2} {y1:.2} c\n\
             {c:.2} {y1:.2} {x0:.2} {a:.2} {x0:.2} {cy:.2} c\n\
             {x0:.2} {d:.2} {c:.2} {y0:.2} {cx:.2} {y0:.2} c\n\
             {b:.2} {y0:.2} {x1:.2} {d:.2} {x1:.2} {cy:.2} c\nf",
            x0 = cx - r,
            x1 = cx + r,
            y0 = cy - r,
            y1 = cy + r,
            a = cy + k,
            b = cx + k,
            c = cx - k,
            d = cy - k,
        );

        self.draw_text(text)
    }

    fn end_slide(&mut self) -> Result<()> {
        let content = std::mem::take(&mut self.current);
        self.pages.push(content);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let page_ids: Vec<usize> = (0..self.pages.len())
            .map(|i| FIRST_PAGE_ID + i * 2)
            .collect();
        let object_count = FIRST_PAGE_ID - 1 + self.pages.len() * 2;
        let mut writer = ObjectWriter::new(object_count);

        writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>");

        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        writer.object(
            2,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_ids.len()
            ),
        );

        for (id, font) in [(3, self.font.clone()), (4, format!("{}-Bold", self.font))] {
            writer.object(
                id,
                &format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font
                ),
            );
        }

        writer.object(
            5,
            &format!(
                "<< /Title {} /Author {} /Subject {} /Producer {} /CreationDate ({}) >>",
                info_string(&self.title),
                info_string(AUTHOR),
                info_string(&self.subject),
                info_string(env!("CARGO_PKG_NAME")),
                chrono::Utc::now().format("D:%Y%m%d%H%M%SZ")
            ),
        );

        for (content, page_id) in self.pages.iter().zip(&page_ids) {
            writer.object(
                *page_id,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    self.geometry.width,
                    self.geometry.height,
                    page_id + 1
                ),
            );
            writer.object(
                page_id + 1,
                &format!(
                    "<< /Length {} >>\nstream\n{}endstream",
                    content.len(),
                    content
                ),
            );
        }

        Ok(writer.finish())
    }
}

/// Tracks byte offsets for the cross-reference table
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new(object_count: usize) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: vec![0; object_count],
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets[id - 1] = self.buf.len();
        self.buf
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = writeln!(xref, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.offsets.len() + 1,
            xref_offset
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Literal string body for WinAnsi text: escapes delimiters, octal-encodes Latin-1
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

/// UTF-16BE hex string with byte order mark, for document metadata
fn info_string(text: &str) -> String {
    let mut out = String::from("<FEFF");
    for unit in text.encode_utf16() {
        let _ = write!(out, "{:04X}", unit);
    }
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::draw_slides;
    use crate::render::theme::{Medium, Theme};
    use crate::types::Slide;

    fn render(slides: &[Slide]) -> Vec<u8> {
        let theme = Theme::resolve("default", Medium::Document);
        let surface = PdfSurface::new(PageGeometry::document(), theme.font, "Deck", "Topic");
        draw_slides(surface, slides, &theme, &PageGeometry::document()).unwrap()
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_page_per_slide() {
        let bytes = render(&[
            Slide::title("Climate Change").with_subtitle("Students"),
            Slide::content("Facts", vec!["Seas (rise)".to_string()]),
        ]);
        let text = as_text(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("(Climate Change) Tj"));
        assert!(text.contains("(Seas \\(rise\\)) Tj"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render(&[Slide::title("One"), Slide::content("Two", vec![])]);
        let text = as_text(&bytes);

        let startxref: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(bytes[startxref..].starts_with(b"xref"));

        let table = &text[text.find("xref\n").unwrap()..];
        for (id, line) in table.lines().skip(3).take(9).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", id + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {}", id + 1);
        }
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("a(b)\\c"), "a\\(b\\)\\\\c");
        assert_eq!(encode_text("café"), "caf\\351");
        assert_eq!(encode_text("Привет"), "??????");
    }

    #[test]
    fn test_info_string_utf16() {
        assert_eq!(info_string("Hi"), "<FEFF00480069>");
        assert_eq!(info_string("Я"), "<FEFF042F>");
    }
}
