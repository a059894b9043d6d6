pub mod columns;
pub mod matching;
pub mod merge;
pub mod rows;

use regex::Regex;
use serde::Serialize;

use crate::extraction::{ImageSpan, PageContent, Positioned, TextSpan};
use crate::model::UNKNOWN_NAME;
use crate::profile::schema::{CategoryMode, CategoryProfile, UnpairedPolicy};
use columns::{pair_names_by_column, single_labels, PairRule};
use matching::match_images_to_records;
use merge::{merge_adjacent_text_spans, sort_for_merge, MergeRule};
use rows::{cluster_into_rows, flatten_rows};

/// Number of leading and trailing lines searched for a category heading.
const HEADING_HEAD_LINES: usize = 10;
const HEADING_TAIL_LINES: usize = 25;

/// A label resolved into a scientific/common name pair, placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub scientific_name: String,
    pub common_name: String,
    pub x: f32,
    pub y: f32,
}

impl Positioned for LabelEntry {
    fn x(&self) -> f32 {
        self.x
    }
    fn y(&self) -> f32 {
        self.y
    }
}

/// One reconstructed entry of a page, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEntry {
    Labelled {
        label: LabelEntry,
        image: Option<ImageSpan>,
    },
    /// Image with no caption; named later from the profile's synthesized label.
    ImageOnly(ImageSpan),
}

/// Everything recovered from one page for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_number: usize,
    pub entries: Vec<PageEntry>,
    /// Images that survived the region and size filters.
    pub images_found: usize,
    /// Labels produced before image matching.
    pub labels_found: usize,
}

/// Text lines of a page in reading order, with split fragments rejoined,
/// whitespace trimmed and blank lines removed.
pub fn merged_lines(page: &PageContent, rule: &MergeRule) -> Vec<TextSpan> {
    merge_into_lines(page.text_spans().cloned().collect(), rule)
}

fn merge_into_lines(mut spans: Vec<TextSpan>, rule: &MergeRule) -> Vec<TextSpan> {
    sort_for_merge(&mut spans);
    merge_adjacent_text_spans(spans, rule)
        .into_iter()
        .filter_map(|mut span| {
            span.text = span.text.trim().to_string();
            (!span.text.is_empty()).then_some(span)
        })
        .collect()
}

fn is_heading(text: &str, headings: &[String]) -> bool {
    headings.iter().any(|h| h.trim().eq_ignore_ascii_case(text.trim()))
}

/// Find the first category heading among the page's leading or trailing lines.
pub fn detect_heading<'a>(lines: &[TextSpan], headings: &'a [String]) -> Option<&'a str> {
    let head = lines.iter().take(HEADING_HEAD_LINES);
    let tail = lines.iter().skip(lines.len().saturating_sub(HEADING_TAIL_LINES));
    head.chain(tail).find_map(|line| {
        headings
            .iter()
            .find(|h| h.trim().eq_ignore_ascii_case(line.text.trim()))
            .map(String::as_str)
    })
}

/// Rebuild one page's catalogue entries under a category profile.
///
/// Returns `None` when the profile requires a heading and the page has none.
/// `skip` holds the profile's compiled skip patterns.
pub fn reconstruct_page(
    page: &PageContent,
    profile: &CategoryProfile,
    skip: &[Regex],
) -> Option<PageLayout> {
    let t = &profile.thresholds;
    let rule = MergeRule::from(t);

    if profile.require_heading
        && detect_heading(&merged_lines(page, &rule), &profile.headings).is_none()
    {
        log::debug!(
            "page {}: no '{}' heading, skipping",
            page.page_number,
            profile.name
        );
        return None;
    }

    let region = profile.region_for(page.page_number);

    // Filter raw spans first so an excluded fragment cannot glue onto a label.
    let kept: Vec<TextSpan> = page
        .text_spans()
        .filter(|s| region.contains(s.y))
        .filter(|s| !is_heading(&s.text, &profile.headings))
        .filter(|s| !skip.iter().any(|re| re.is_match(s.text.trim())))
        .cloned()
        .collect();
    let texts: Vec<TextSpan> = merge_into_lines(kept, &rule)
        .into_iter()
        .filter(|s| !is_heading(&s.text, &profile.headings))
        .collect();

    let images: Vec<ImageSpan> = page
        .image_spans()
        .filter(|img| region.contains(img.y))
        .filter(|img| {
            let keep = img.byte_len() >= t.min_image_bytes;
            if !keep {
                log::debug!(
                    "page {}: dropping {}-byte image at ({}, {})",
                    page.page_number,
                    img.byte_len(),
                    img.x,
                    img.y
                );
            }
            keep
        })
        .cloned()
        .collect();
    let images_found = images.len();

    let labels = match profile.mode {
        CategoryMode::NoLabel => {
            let image_rows = cluster_into_rows(images, t.image_row_y);
            log::debug!(
                "page {}: {} image rows, no labels",
                page.page_number,
                image_rows.len()
            );
            let entries: Vec<PageEntry> = flatten_rows(image_rows)
                .into_iter()
                .map(PageEntry::ImageOnly)
                .collect();
            return Some(PageLayout {
                page_number: page.page_number,
                entries,
                images_found,
                labels_found: 0,
            });
        }
        CategoryMode::Paired => {
            let pairing = pair_names_by_column(texts, &PairRule::from(t));
            let mut labels = pairing.labels;
            match profile.unpaired {
                UnpairedPolicy::Keep => labels.extend(pairing.unpaired.into_iter().map(|s| {
                    LabelEntry {
                        scientific_name: s.text,
                        common_name: UNKNOWN_NAME.to_string(),
                        x: s.x,
                        y: s.y,
                    }
                })),
                UnpairedPolicy::Drop => {
                    for line in &pairing.unpaired {
                        log::debug!("page {}: unpaired line '{}'", page.page_number, line.text);
                    }
                }
            }
            labels
        }
        CategoryMode::SingleLabel => single_labels(
            texts,
            profile.continuation.as_ref(),
            profile.generic_scientific_name.as_deref(),
        ),
    };
    let labels_found = labels.len();

    let label_rows = cluster_into_rows(labels, t.label_row_y);
    let image_rows = cluster_into_rows(images, t.image_row_y);
    log::debug!(
        "page {}: {} image rows, {} label rows",
        page.page_number,
        image_rows.len(),
        label_rows.len()
    );

    let entries = match_images_to_records(
        image_rows,
        label_rows,
        profile.match_policy,
        t.nearest_margin,
    )
    .into_iter()
    .map(|m| PageEntry::Labelled {
        label: m.label,
        image: m.image,
    })
    .collect();

    Some(PageLayout {
        page_number: page.page_number,
        entries,
        images_found,
        labels_found,
    })
}
