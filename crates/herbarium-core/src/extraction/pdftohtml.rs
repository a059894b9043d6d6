use crate::error::HerbariumError;
use crate::extraction::{ImageSpan, PageContent, PdfExtractor, PositionedItem, TextSpan};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use std::process::Command;

const OUTPUT_STEM: &str = "page";

/// PDF extraction backend using pdftohtml (from poppler-utils).
///
/// Runs `pdftohtml -xml -zoom 1` so coordinates come out in PDF points with
/// the origin at the top-left of the page, and reads the images it dumps
/// next to the XML.
pub struct PdftohtmlExtractor;

impl PdftohtmlExtractor {
    pub fn new() -> Self {
        PdftohtmlExtractor
    }

    /// Check if pdftohtml is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftohtml")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftohtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftohtmlExtractor {
    fn extract_pages(
        &self,
        pdf_bytes: &[u8],
        pages: &[usize],
    ) -> Result<Vec<PageContent>, HerbariumError> {
        let (first, last) = match (pages.iter().min(), pages.iter().max()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(Vec::new()),
        };

        let workdir = tempfile::tempdir().map_err(|e| HerbariumError::Extraction(e.to_string()))?;
        let pdf_path = workdir.path().join("input.pdf");
        std::fs::write(&pdf_path, pdf_bytes)
            .map_err(|e| HerbariumError::Extraction(e.to_string()))?;

        // Relative output stem so image `src` attributes resolve against the workdir.
        let output = Command::new("pdftohtml")
            .current_dir(workdir.path())
            .arg("-xml")
            .arg("-zoom")
            .arg("1")
            .arg("-q")
            .arg("-f")
            .arg(first.to_string())
            .arg("-l")
            .arg(last.to_string())
            .arg(&pdf_path)
            .arg(OUTPUT_STEM)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    HerbariumError::PdftohtmlNotFound
                } else {
                    HerbariumError::Extraction(format!("pdftohtml failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(HerbariumError::PdftohtmlFailed { code, stderr });
        }

        let xml_path = workdir.path().join(format!("{OUTPUT_STEM}.xml"));
        let xml = std::fs::read_to_string(&xml_path)
            .map_err(|e| HerbariumError::Extraction(format!("{}: {}", xml_path.display(), e)))?;

        let contents = parse_pdf2xml(&xml)?
            .into_iter()
            .filter(|p| pages.contains(&p.page_number))
            .map(|p| p.load_images(workdir.path()))
            .collect();

        Ok(contents)
    }

    fn backend_name(&self) -> &str {
        "pdftohtml"
    }
}

#[derive(Debug, Clone)]
struct RawImage {
    x: f32,
    y: f32,
    src: String,
}

#[derive(Debug, Clone, Default)]
struct RawPage {
    page_number: usize,
    texts: Vec<TextSpan>,
    images: Vec<RawImage>,
}

impl RawPage {
    /// Read the image payloads referenced by this page.
    ///
    /// An image file that cannot be read is dropped with a warning; the rest
    /// of the page is still usable.
    fn load_images(self, dir: &Path) -> PageContent {
        let mut items: Vec<PositionedItem> =
            self.texts.into_iter().map(PositionedItem::Text).collect();

        for image in self.images {
            let path = dir.join(&image.src);
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!(
                        "page {}: skipping image {}: {}",
                        self.page_number,
                        image.src,
                        e
                    );
                    continue;
                }
            };
            let format = Path::new(&image.src)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase())
                .unwrap_or_else(|| "png".into());
            items.push(PositionedItem::Image(ImageSpan {
                x: image.x,
                y: image.y,
                format,
                bytes,
            }));
        }

        PageContent {
            page_number: self.page_number,
            items,
        }
    }
}

/// Parse pdftohtml's `pdf2xml` document into per-page spans.
fn parse_pdf2xml(xml: &str) -> Result<Vec<RawPage>, HerbariumError> {
    let mut reader = Reader::from_str(xml);
    let mut pages = Vec::new();
    let mut current: Option<RawPage> = None;
    // Open <text> element: (left, width, top, accumulated content)
    let mut open_text: Option<(f32, f32, f32, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    let page_number = required_attr(&e, "number")?
                        .parse()
                        .map_err(|_| HerbariumError::Xml("non-numeric page number".into()))?;
                    current = Some(RawPage {
                        page_number,
                        ..RawPage::default()
                    });
                }
                b"text" => {
                    open_text = Some((
                        attr_f32(&e, "left")?,
                        attr_f32(&e, "width")?,
                        attr_f32(&e, "top")?,
                        String::new(),
                    ));
                }
                b"image" => push_image(&mut current, &e)?,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"image" {
                    push_image(&mut current, &e)?;
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, _, _, content)) = open_text.as_mut() {
                    match t.unescape() {
                        Ok(s) => content.push_str(&s),
                        Err(_) => content.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"text" => {
                    if let (Some((left, width, top, content)), Some(page)) =
                        (open_text.take(), current.as_mut())
                    {
                        let text = content.trim();
                        if !text.is_empty() {
                            page.texts.push(TextSpan::new(text, left, left + width, top));
                        }
                    }
                }
                b"page" => {
                    if let Some(page) = current.take() {
                        pages.push(page);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(HerbariumError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn push_image(current: &mut Option<RawPage>, e: &BytesStart<'_>) -> Result<(), HerbariumError> {
    let image = RawImage {
        x: attr_f32(e, "left")?,
        y: attr_f32(e, "top")?,
        src: required_attr(e, "src")?,
    };
    if let Some(page) = current.as_mut() {
        page.images.push(image);
    }
    Ok(())
}

fn required_attr(e: &BytesStart<'_>, name: &str) -> Result<String, HerbariumError> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| HerbariumError::Xml(err.to_string()))?
        .ok_or_else(|| {
            HerbariumError::Xml(format!(
                "<{}> is missing attribute '{}'",
                String::from_utf8_lossy(e.name().as_ref()),
                name
            ))
        })?;
    let value = attr
        .unescape_value()
        .map_err(|err| HerbariumError::Xml(err.to_string()))?;
    Ok(value.into_owned())
}

fn attr_f32(e: &BytesStart<'_>, name: &str) -> Result<f32, HerbariumError> {
    let raw = required_attr(e, name)?;
    raw.trim()
        .parse()
        .map_err(|_| HerbariumError::Xml(format!("attribute '{}' is not a number: {}", name, raw)))
}
