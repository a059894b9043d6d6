use serde::{Deserialize, Serialize};

/// How text labels on a page turn into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMode {
    /// Scientific name line stacked above a common name line.
    #[default]
    Paired,
    /// Every label is its own record (cultivar-only categories).
    SingleLabel,
    /// No usable labels; images alone become records.
    NoLabel,
}

/// How images are assigned to records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Nth image in reading order goes to the Nth record.
    #[default]
    Index,
    /// Closest unused image by horizontal distance, roughly above the label.
    Nearest,
}

/// What to do with a line left over after column pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnpairedPolicy {
    #[default]
    Drop,
    /// Emit it as a scientific name with an "Unknown" common name.
    Keep,
}

/// Vertical band of the page a category occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_y: Option<f32>,
}

impl Region {
    pub fn contains(&self, y: f32) -> bool {
        self.min_y.map_or(true, |min| y >= min) && self.max_y.map_or(true, |max| y <= max)
    }
}

/// Region override for one page (used when a page holds two categories).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRegion {
    pub page: usize,
    #[serde(flatten)]
    pub region: Region,
}

/// Window in which a second line below a label continues that label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    #[serde(default = "default_continuation_min_dy")]
    pub min_dy: f32,
    #[serde(default = "default_continuation_max_dy")]
    pub max_dy: f32,
    #[serde(default = "default_continuation_max_dx")]
    pub max_dx: f32,
    /// Text that opens a new entry, e.g. the genus of a cultivar list. A line
    /// starting with it is never a continuation, and a label containing it
    /// more than once is split at each occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_entry_prefix: Option<String>,
}

impl Default for Continuation {
    fn default() -> Self {
        Continuation {
            min_dy: default_continuation_min_dy(),
            max_dy: default_continuation_max_dy(),
            max_dx: default_continuation_max_dx(),
            new_entry_prefix: None,
        }
    }
}

fn default_continuation_min_dy() -> f32 {
    5.0
}
fn default_continuation_max_dy() -> f32 {
    35.0
}
fn default_continuation_max_dx() -> f32 {
    60.0
}

/// Geometry and size thresholds, in PDF points unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Row clustering distance for images.
    pub image_row_y: f32,
    /// Row clustering distance for paired label records.
    pub label_row_y: f32,
    /// Maximum distance from a column's anchor x.
    pub column_x: f32,
    /// Exclusive lower bound on the vertical gap of a name pair.
    pub pair_min_y: f32,
    /// Exclusive upper bound on the vertical gap of a name pair.
    pub pair_y: f32,
    /// Maximum vertical offset between fragments of one label.
    pub merge_y: f32,
    /// Inclusive lower bound on the horizontal gap between fragments.
    pub merge_gap_min: f32,
    /// Exclusive upper bound on the horizontal gap between fragments.
    pub merge_gap_max: f32,
    /// Images smaller than this many bytes are treated as logos.
    pub min_image_bytes: usize,
    /// How far below a label's top edge a nearest-policy image may start.
    pub nearest_margin: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            image_row_y: 80.0,
            label_row_y: 80.0,
            column_x: 60.0,
            pair_min_y: 0.0,
            pair_y: 25.0,
            merge_y: 3.0,
            merge_gap_min: -2.0,
            merge_gap_max: 5.0,
            min_image_bytes: 5000,
            nearest_margin: 200.0,
        }
    }
}

/// Extraction settings for one catalogue category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub name: String,
    /// Output directory name and image URL segment.
    pub slug: String,
    /// Category written into every record.
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 1-based page numbers the category occupies.
    pub pages: Vec<usize>,
    #[serde(default)]
    pub mode: CategoryMode,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    /// Heading lines that name the category on a page.
    #[serde(default)]
    pub headings: Vec<String>,
    /// Skip pages on which none of `headings` appear.
    #[serde(default)]
    pub require_heading: bool,
    /// Case-insensitive regexes for boilerplate lines (headers, footers).
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub page_regions: Vec<PageRegion>,
    /// Genus used as scientific name when labels carry none.
    #[serde(default)]
    pub generic_scientific_name: Option<String>,
    /// Name prefix for image-only records, e.g. "Pineapple Variety".
    #[serde(default)]
    pub synthesized_label: Option<String>,
    #[serde(default)]
    pub unpaired: UnpairedPolicy,
    #[serde(default)]
    pub continuation: Option<Continuation>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl CategoryProfile {
    /// Region in effect for a page, honouring per-page overrides.
    pub fn region_for(&self, page_number: usize) -> Region {
        self.page_regions
            .iter()
            .find(|r| r.page == page_number)
            .map(|r| r.region)
            .unwrap_or(self.region)
    }
}
