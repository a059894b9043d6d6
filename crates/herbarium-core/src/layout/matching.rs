use crate::extraction::ImageSpan;
use crate::layout::rows::{flatten_rows, Row};
use crate::layout::LabelEntry;
use crate::profile::schema::MatchPolicy;

/// A label together with the image assigned to it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedLabel {
    pub label: LabelEntry,
    pub image: Option<ImageSpan>,
}

/// Assign images to labels. Both sides are consumed in row-major order and
/// every label is returned, with or without an image.
pub fn match_images_to_records(
    image_rows: Vec<Row<ImageSpan>>,
    record_rows: Vec<Row<LabelEntry>>,
    policy: MatchPolicy,
    nearest_margin: f32,
) -> Vec<MatchedLabel> {
    let images = flatten_rows(image_rows);
    let labels = flatten_rows(record_rows);

    match policy {
        MatchPolicy::Index => match_by_index(images, labels),
        MatchPolicy::Nearest => match_by_nearest(images, labels, nearest_margin),
    }
}

fn match_by_index(images: Vec<ImageSpan>, labels: Vec<LabelEntry>) -> Vec<MatchedLabel> {
    let mut images = images.into_iter();
    labels
        .into_iter()
        .map(|label| MatchedLabel {
            label,
            image: images.next(),
        })
        .collect()
}

fn match_by_nearest(
    images: Vec<ImageSpan>,
    labels: Vec<LabelEntry>,
    margin: f32,
) -> Vec<MatchedLabel> {
    let mut pool: Vec<Option<ImageSpan>> = images.into_iter().map(Some).collect();

    labels
        .into_iter()
        .map(|label| {
            let mut best: Option<(usize, f32)> = None;
            for (i, slot) in pool.iter().enumerate() {
                let Some(image) = slot else { continue };
                if image.y >= label.y + margin {
                    continue;
                }
                let dx = (image.x - label.x).abs();
                if best.map_or(true, |(_, d)| dx < d) {
                    best = Some((i, dx));
                }
            }
            let image = best.and_then(|(i, _)| pool[i].take());
            MatchedLabel { label, image }
        })
        .collect()
}
