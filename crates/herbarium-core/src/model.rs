use serde::Serialize;
use std::fmt;

/// Placeholder for a name that could not be read from the page.
pub const UNKNOWN_NAME: &str = "Unknown";

/// An image attached to a record, named uniquely within the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReference {
    pub filename: String,
    pub format: String,
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueRecord {
    /// 1-based, gap-free over one run.
    #[serde(rename = "id")]
    pub sequence_id: usize,
    pub scientific_name: String,
    pub common_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
}

impl CatalogueRecord {
    /// Name an attached image is derived from: the common name, or the
    /// scientific name when the common name is unknown.
    pub fn filename_base(&self) -> &str {
        if self.common_name == UNKNOWN_NAME {
            &self.scientific_name
        } else {
            &self.common_name
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_reference.is_some()
    }
}

impl fmt::Display for CatalogueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.common_name, self.scientific_name)
    }
}

/// Per-page counts, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub images: usize,
    pub labels: usize,
    pub records: usize,
}

/// All records extracted for one category profile.
#[derive(Debug, Clone, Serialize)]
pub struct Catalogue {
    pub profile: String,
    pub slug: String,
    pub category: String,
    pub records: Vec<CatalogueRecord>,
    pub pages: Vec<PageSummary>,
    /// Pages that were requested but had no matching category heading.
    pub skipped_pages: Vec<usize>,
}

impl Catalogue {
    pub fn image_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_image()).count()
    }
}
