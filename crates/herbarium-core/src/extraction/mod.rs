pub mod pdftohtml;

use serde::Serialize;

use crate::error::HerbariumError;

/// Anything placed on a page by its top-left corner.
pub trait Positioned {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
}

/// One contiguous run of text as reported by the extraction backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub x_end: f32,
    pub y: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, x_end: f32, y: f32) -> Self {
        TextSpan {
            text: text.into(),
            x,
            x_end,
            y,
        }
    }
}

/// One embedded image with its placement and raw payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSpan {
    pub x: f32,
    pub y: f32,
    /// File extension of the payload (e.g. "png", "jpg").
    pub format: String,
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
}

impl ImageSpan {
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionedItem {
    Text(TextSpan),
    Image(ImageSpan),
}

impl Positioned for TextSpan {
    fn x(&self) -> f32 {
        self.x
    }
    fn y(&self) -> f32 {
        self.y
    }
}

impl Positioned for ImageSpan {
    fn x(&self) -> f32 {
        self.x
    }
    fn y(&self) -> f32 {
        self.y
    }
}

impl Positioned for PositionedItem {
    fn x(&self) -> f32 {
        match self {
            PositionedItem::Text(t) => t.x,
            PositionedItem::Image(i) => i.x,
        }
    }
    fn y(&self) -> f32 {
        match self {
            PositionedItem::Text(t) => t.y,
            PositionedItem::Image(i) => i.y,
        }
    }
}

/// Positioned content of a single PDF page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContent {
    pub page_number: usize,
    pub items: Vec<PositionedItem>,
}

impl PageContent {
    pub fn text_spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.items.iter().filter_map(|item| match item {
            PositionedItem::Text(t) => Some(t),
            PositionedItem::Image(_) => None,
        })
    }

    pub fn image_spans(&self) -> impl Iterator<Item = &ImageSpan> {
        self.items.iter().filter_map(|item| match item {
            PositionedItem::Image(i) => Some(i),
            PositionedItem::Text(_) => None,
        })
    }
}

/// Trait for PDF page extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned spans for the requested 1-based page numbers.
    ///
    /// Pages outside the document are silently absent from the result.
    fn extract_pages(
        &self,
        pdf_bytes: &[u8],
        pages: &[usize],
    ) -> Result<Vec<PageContent>, HerbariumError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
