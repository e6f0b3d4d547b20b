//! PPTX Backend
//!
//! Builds a minimal PresentationML package by hand: one master, one blank
//! layout, one theme, and a slide part per slide holding absolutely placed
//! text boxes and ellipse bullet markers over a solid background.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

use super::layout::{Align, Marker, PageGeometry, SlidePlan, Surface, TextBox};
use super::theme::{Rgb, Theme};
use crate::constants::artifact::AUTHOR;
use crate::constants::layout::EMU_PER_POINT;
use crate::types::{Result, ResultExt};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// Escaped text with characters XML 1.0 forbids (C0 controls other than
/// tab/LF/CR, U+FFFE, U+FFFF) replaced by `?`
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => '?',
            _ => c,
        })
        .collect();
    escape(&cleaned).into_owned()
}

fn emu(points: f32) -> i64 {
    (points * EMU_PER_POINT as f32).round() as i64
}

pub struct PptxSurface {
    geometry: PageGeometry,
    theme: Theme,
    title: String,
    subject: String,
    slides: Vec<String>,
    shapes: String,
    background: Rgb,
    next_shape_id: u32,
}

impl PptxSurface {
    pub fn new(geometry: PageGeometry, theme: &Theme, title: &str, subject: &str) -> Self {
        Self {
            geometry,
            theme: theme.clone(),
            title: title.to_string(),
            subject: subject.to_string(),
            slides: Vec::new(),
            shapes: String::new(),
            background: theme.background,
            next_shape_id: 2,
        }
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn parts(&self) -> Vec<(String, String)> {
        let count = self.slides.len();
        let mut parts = vec![
            ("[Content_Types].xml".to_string(), content_types(count)),
            ("_rels/.rels".to_string(), package_rels()),
            ("docProps/core.xml".to_string(), core_props(&self.title, &self.subject)),
            ("docProps/app.xml".to_string(), app_props(count)),
            ("ppt/presentation.xml".to_string(), presentation(count, &self.geometry)),
            ("ppt/_rels/presentation.xml.rels".to_string(), presentation_rels(count)),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                relationships(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "theme", "../theme/theme1.xml"),
                ]),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ),
            ("ppt/theme/theme1.xml".to_string(), theme_part(&self.theme)),
        ];

        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{}.xml", n), slide.clone()));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
        }
        parts
    }
}

impl Surface for PptxSurface {
    fn begin_slide(&mut self, plan: &SlidePlan) -> Result<()> {
        self.shapes.clear();
        self.background = plan.background;
        self.next_shape_id = 2;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextBox) -> Result<()> {
        let id = self.shape_id();
        let align = match text.align {
            Align::Left => "l",
            Align::Center => "ctr",
        };
        let bold = if text.bold { " b=\"1\"" } else { "" };

        self.shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" lIns="0" tIns="0" rIns="0" bIns="0"><a:spAutoFit/></a:bodyPr><a:lstStyle/><a:p><a:pPr algn="{align}"/><a:r><a:rPr lang="en-US" sz="{sz}"{bold} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="{font}"/><a:cs typeface="{font}"/></a:rPr><a:t>{body}</a:t></a:r></a:p></p:txBody></p:sp>"#,
            x = emu(text.x),
            y = emu(text.y),
            cx = emu(text.width),
            cy = emu(text.height()),
            sz = (text.size * 100.0).round() as i64,
            color = text.color,
            font = escape(self.theme.font),
            body = xml_text(&text.text()),
        ));
        Ok(())
    }

    fn draw_bullet(&mut self, marker: &Marker, text: &TextBox) -> Result<()> {
        let id = self.shape_id();
        let diameter = emu(marker.radius * 2.0);

        self.shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Bullet {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{diameter}" cy="{diameter}"/></a:xfrm><a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#,
            x = emu(marker.cx - marker.radius),
            y = emu(marker.cy - marker.radius),
            color = marker.color,
        ));

        self.draw_text(text)
    }

    fn end_slide(&mut self) -> Result<()> {
        let slide = format!(
            r#"{XML_HEADER}<p:sld {NS_DECL}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{bg}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{group}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            bg = self.background,
            group = GROUP_SHAPE_PROPS,
            shapes = std::mem::take(&mut self.shapes),
        );
        self.slides.push(slide);
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, body) in self.parts() {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(body.as_bytes())
                .render_context(format!("write {}", name))?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

// =============================================================================
// Package Parts
// =============================================================================

const GROUP_SHAPE_PROPS: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn content_types(slide_count: usize) -> String {
    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), format!("{CT_BASE}.presentationml.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), format!("{CT_BASE}.presentationml.slideMaster+xml")),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), format!("{CT_BASE}.presentationml.slideLayout+xml")),
        ("/ppt/theme/theme1.xml".to_string(), format!("{CT_BASE}.theme+xml")),
        ("/docProps/core.xml".to_string(), "application/vnd.openxmlformats-package.core-properties+xml".to_string()),
        ("/docProps/app.xml".to_string(), format!("{CT_BASE}.extended-properties+xml")),
    ];
    for n in 1..=slide_count {
        overrides.push((
            format!("/ppt/slides/slide{}.xml", n),
            format!("{CT_BASE}.presentationml.slide+xml"),
        ));
    }

    let overrides: String = overrides
        .iter()
        .map(|(part, ct)| format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#))
        .collect();

    format!(
        r#"{XML_HEADER}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
    )
}

/// Relationships part; `kind` is appended to the officeDocument relationship namespace
fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"{XML_HEADER}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

fn package_rels() -> String {
    format!(
        r#"{XML_HEADER}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_BASE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn core_props(title: &str, subject: &str) -> String {
    format!(
        r#"{XML_HEADER}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:subject>{subject}</dc:subject><dc:creator>{author}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created></cp:coreProperties>"#,
        title = xml_text(title),
        subject = xml_text(subject),
        author = escape(AUTHOR),
        created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        r#"{XML_HEADER}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application><Slides>{slide_count}</Slides></Properties>"#,
        env!("CARGO_PKG_NAME")
    )
}

fn presentation(slide_count: usize, geometry: &PageGeometry) -> String {
    let slide_ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
        .collect();
    let (cx, cy) = (emu(geometry.width), emu(geometry.height));

    format!(
        r#"{XML_HEADER}<p:presentation {NS_DECL}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="{cy}" cy="{cx}"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let targets: Vec<(String, &str, String)> = std::iter::once((
        "rId1".to_string(),
        "slideMaster",
        "slideMasters/slideMaster1.xml".to_string(),
    ))
    .chain((1..=slide_count).map(|n| {
        (
            format!("rId{}", n + 1),
            "slide",
            format!("slides/slide{}.xml", n),
        )
    }))
    .chain(std::iter::once((
        format!("rId{}", slide_count + 2),
        "theme",
        "theme/theme1.xml".to_string(),
    )))
    .collect();

    let rels: Vec<(&str, &str, &str)> = targets
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    relationships(&rels)
}

fn slide_master() -> String {
    format!(
        r#"{XML_HEADER}<p:sldMaster {NS_DECL}><p:cSld><p:spTree>{GROUP_SHAPE_PROPS}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_HEADER}<p:sldLayout {NS_DECL} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{GROUP_SHAPE_PROPS}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme_part(theme: &Theme) -> String {
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        r#"{XML_HEADER}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="{title}"/></a:dk1><a:lt1><a:srgbClr val="{bg}"/></a:lt1><a:dk2><a:srgbClr val="{text}"/></a:dk2><a:lt2><a:srgbClr val="{bg}"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="{accent}"/></a:accent2><a:accent3><a:srgbClr val="{accent}"/></a:accent3><a:accent4><a:srgbClr val="{accent}"/></a:accent4><a:accent5><a:srgbClr val="{accent}"/></a:accent5><a:accent6><a:srgbClr val="{accent}"/></a:accent6><a:hlink><a:srgbClr val="{accent}"/></a:hlink><a:folHlink><a:srgbClr val="{accent}"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="{name}"><a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        name = theme.style.as_str(),
        title = theme.title_color,
        bg = theme.background,
        text = theme.text_color,
        accent = theme.accent,
        font = escape(theme.font),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::draw_slides;
    use crate::render::theme::Medium;
    use crate::types::Slide;
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use std::io::Read;
    use zip::ZipArchive;

    fn render(slides: &[Slide], style: &str) -> Vec<u8> {
        let theme = Theme::resolve(style, Medium::Deck);
        let geometry = PageGeometry::deck();
        let surface = PptxSurface::new(geometry, &theme, "Deck & Co", "Topic");
        draw_slides(surface, slides, &theme, &geometry).unwrap()
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut part = archive.by_name(name).unwrap();
        let mut body = String::new();
        part.read_to_string(&mut body).unwrap();
        body
    }

    #[test]
    fn test_package_parts() {
        let bytes = render(
            &[
                Slide::title("Climate <Change>"),
                Slide::content("Facts", vec!["A".to_string(), "B".to_string()]),
            ],
            "default",
        );
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let slides = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count();
        assert_eq!(slides, 2);

        let presentation = read_part(&mut archive, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        assert!(presentation.contains(r#"r:id="rId3""#));

        let title = read_part(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains("Climate &lt;Change&gt;"));

        let core = read_part(&mut archive, "docProps/core.xml");
        assert!(core.contains("<dc:title>Deck &amp; Co</dc:title>"));
        assert!(core.contains("AI Presentation Generator"));
    }

    #[test]
    fn test_every_part_is_well_formed() {
        let bytes = render(
            &[Slide::title("T").with_subtitle("S"), Slide::content("C", vec!["x".into()])],
            "creative",
        );
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = archive.file_names().map(String::from).collect();

        for name in names {
            let body = read_part(&mut archive, &name);
            let mut reader = Reader::from_str(&body);
            loop {
                match reader.read_event() {
                    Ok(Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{} is malformed: {}", name, e),
                }
            }
        }
    }

    #[test]
    fn test_content_slide_shapes() {
        let bytes = render(
            &[Slide::content("Facts", vec!["One".to_string(), "Two".to_string()])],
            "dark",
        );
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let slide = read_part(&mut archive, "ppt/slides/slide1.xml");

        assert!(slide.contains(r#"<a:srgbClr val="2F3437"/>"#));
        assert_eq!(slide.matches(r#"prst="ellipse""#).count(), 2);
        assert!(slide.contains(r#"typeface="Calibri""#));
        assert!(slide.contains(r#"sz="2800" b="1""#));
        assert!(slide.contains(r#"sz="1800" dirty="0""#));
    }

    #[test]
    fn test_control_characters_replaced() {
        let bytes = render(&[Slide::title("Bell\u{7}Title <x>")], "default");
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let slide = read_part(&mut archive, "ppt/slides/slide1.xml");
        assert!(!slide.contains('\u{7}'));
        assert!(slide.contains("Bell?Title &lt;x&gt;"));
    }

    #[test]
    fn test_xml_text() {
        assert_eq!(xml_text("a\tb\nc"), "a\tb\nc");
        assert_eq!(xml_text("nul\u{0}\u{1b}[0m"), "nul??[0m");
        assert_eq!(xml_text("\u{fffe}&\u{ffff}"), "?&amp;?");
        assert_eq!(xml_text("Привет"), "Привет");
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(emu(720.0), 9_144_000);
        assert_eq!(emu(405.0), 5_143_500);
        assert_eq!(emu(0.5), 6350);
    }
}
