//! Rendering
//!
//! `PresentationData` + style → binary artifact on disk.
//!
//! Both formats share the layout in [`layout`]; each backend only implements
//! the [`layout::Surface`] drawing primitives. Visual elements are not drawn.

pub mod layout;
pub mod pdf;
pub mod pptx;
pub mod theme;

pub use layout::{PageGeometry, Surface, draw_slides, plan_slide};
pub use theme::{Medium, Rgb, StyleName, Theme};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::artifact::FILE_PREFIX;
use crate::types::{OutputFormat, PresentationData, Result, ResultExt};

/// One output format backend
pub trait Renderer: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn geometry(&self) -> PageGeometry;

    fn render(&self, data: &PresentationData, theme: &Theme) -> Result<Vec<u8>>;
}

/// PDF, A4 landscape
pub struct DocumentRenderer;

impl Renderer for DocumentRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Document
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::document()
    }

    fn render(&self, data: &PresentationData, theme: &Theme) -> Result<Vec<u8>> {
        let geometry = self.geometry();
        let surface = pdf::PdfSurface::new(geometry, theme.font, &data.title, &data.title);
        draw_slides(surface, &data.slides, theme, &geometry)
    }
}

/// PPTX, 16:9
pub struct DeckRenderer;

impl Renderer for DeckRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Deck
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::deck()
    }

    fn render(&self, data: &PresentationData, theme: &Theme) -> Result<Vec<u8>> {
        let geometry = self.geometry();
        let surface = pptx::PptxSurface::new(geometry, theme, &data.title, &data.title);
        draw_slides(surface, &data.slides, theme, &geometry)
    }
}

pub fn renderer_for(format: OutputFormat) -> &'static dyn Renderer {
    match format {
        OutputFormat::Document => &DocumentRenderer,
        OutputFormat::Deck => &DeckRenderer,
    }
}

/// A rendered file in the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub filename: String,
    pub path: PathBuf,
}

/// `presentation_<millis>.<ext>`
pub fn output_filename(format: OutputFormat) -> String {
    format!(
        "{}_{}.{}",
        FILE_PREFIX,
        chrono::Utc::now().timestamp_millis(),
        format.extension()
    )
}

/// Render `data` in `format` with the named style and write it under `output_dir`
pub async fn render_to_file(
    data: &PresentationData,
    style: &str,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<RenderedFile> {
    let renderer = renderer_for(format);
    let theme = Theme::resolve(style, Medium::from(format));
    let bytes = renderer.render(data, &theme)?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .render_context(format!("create {}", output_dir.display()))?;

    let filename = output_filename(format);
    let path = output_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .render_context(format!("write {}", path.display()))?;

    info!(
        file = %path.display(),
        format = %format,
        style = theme.style.as_str(),
        slides = data.slide_count(),
        bytes = bytes.len(),
        "Rendered presentation"
    );

    Ok(RenderedFile { filename, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Slide;
    use regex::Regex;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    fn two_slides() -> PresentationData {
        PresentationData {
            title: "Climate Change".to_string(),
            slides: vec![
                Slide::title("Climate Change").with_subtitle("For Students"),
                Slide::content(
                    "Key Facts",
                    vec!["Seas are rising".to_string(), "Ice is melting".to_string()],
                ),
            ],
        }
    }

    #[tokio::test]
    async fn test_deck_end_to_end() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested/output");

        let file = render_to_file(&two_slides(), "default", OutputFormat::Deck, &out)
            .await
            .unwrap();

        assert!(Regex::new(r"^presentation_\d{13}\.pptx$").unwrap().is_match(&file.filename));
        assert_eq!(file.path, out.join(&file.filename));

        let bytes = std::fs::read(&file.path).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let slide_parts = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count();
        assert_eq!(slide_parts, 2);

        let mut title = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut title)
            .unwrap();

        // Title top edge at height/2 - title size: 202.5 - 44 = 158.5pt
        assert!(title.contains(r#"algn="ctr""#));
        assert!(title.contains(r#"y="2012950""#));
    }

    #[tokio::test]
    async fn test_document_end_to_end() {
        let temp = TempDir::new().unwrap();
        let file = render_to_file(&two_slides(), "dark", OutputFormat::Document, temp.path())
            .await
            .unwrap();

        assert!(file.filename.starts_with("presentation_"));
        assert!(file.filename.ends_with(".pdf"));
        let bytes = std::fs::read(&file.path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
    }

    #[tokio::test]
    async fn test_unwritable_output_is_render_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = render_to_file(&two_slides(), "default", OutputFormat::Deck, &blocker.join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::types::DeckError::Render(_)));
    }

    #[test]
    fn test_renderer_for_format() {
        assert_eq!(renderer_for(OutputFormat::Document).format(), OutputFormat::Document);
        assert_eq!(renderer_for(OutputFormat::Deck).geometry(), PageGeometry::deck());
    }
}
