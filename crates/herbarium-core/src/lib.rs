pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod naming;
pub mod output;
pub mod profile;

use error::HerbariumError;
use extraction::{PageContent, PdfExtractor};
use layout::{reconstruct_page, PageEntry};
use model::{Catalogue, CatalogueRecord, ImageReference, PageSummary};
use naming::{safe_filename, FilenameAllocator};
use profile::schema::CategoryProfile;

/// Main API entry point: extract one category's records from a catalogue PDF.
///
/// `pages` overrides the profile's page list when given.
pub fn extract_catalogue(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    profile: &CategoryProfile,
    pages: Option<&[usize]>,
) -> Result<Catalogue, HerbariumError> {
    let pages = pages.unwrap_or(&profile.pages);
    log::info!(
        "extracting '{}' from pages {:?} using {}",
        profile.name,
        pages,
        extractor.backend_name()
    );

    let contents = extractor.extract_pages(pdf_bytes, pages)?;
    assemble_catalogue(&contents, profile)
}

/// Reconstruct every page and number the resulting records.
///
/// Sequence ids run 1..N in page order then row-major order, synthesized
/// names count over the whole run, and image filenames are unique per run.
pub fn assemble_catalogue(
    pages: &[PageContent],
    profile: &CategoryProfile,
) -> Result<Catalogue, HerbariumError> {
    let skip = profile::compile_patterns(&profile.skip_patterns).map_err(|e| {
        HerbariumError::ProfileInvalid {
            profile: profile.name.clone(),
            reason: e.to_string(),
        }
    })?;

    let mut records: Vec<CatalogueRecord> = Vec::new();
    let mut summaries = Vec::new();
    let mut skipped_pages = Vec::new();
    let mut filenames = FilenameAllocator::new();
    let mut synthesized = 0usize;

    for page in pages {
        let Some(layout) = reconstruct_page(page, profile, &skip) else {
            log::info!("page {}: skipped (no category heading)", page.page_number);
            skipped_pages.push(page.page_number);
            continue;
        };

        let before = records.len();
        for entry in layout.entries {
            let (scientific_name, common_name, image) = match entry {
                PageEntry::Labelled { label, image } => {
                    (label.scientific_name, label.common_name, image)
                }
                PageEntry::ImageOnly(image) => {
                    synthesized += 1;
                    let prefix = profile.synthesized_label.as_deref().unwrap_or("Plant");
                    let name = format!("{prefix} {synthesized}");
                    let scientific = profile
                        .generic_scientific_name
                        .clone()
                        .unwrap_or_else(|| name.clone());
                    (scientific, name, Some(image))
                }
            };

            let mut record = CatalogueRecord {
                sequence_id: records.len() + 1,
                scientific_name,
                common_name,
                category: profile.category.clone(),
                page: Some(layout.page_number),
                image_reference: None,
            };
            record.image_reference = image.map(|img| ImageReference {
                filename: filenames.assign(&safe_filename(record.filename_base()), &img.format),
                format: img.format,
                bytes: img.bytes,
            });
            records.push(record);
        }

        let summary = PageSummary {
            page: layout.page_number,
            images: layout.images_found,
            labels: layout.labels_found,
            records: records.len() - before,
        };
        log::info!(
            "page {}: {} records, {} images, {} labels",
            summary.page,
            summary.records,
            summary.images,
            summary.labels
        );
        summaries.push(summary);
    }

    Ok(Catalogue {
        profile: profile.name.clone(),
        slug: profile.slug.clone(),
        category: profile.category.clone(),
        records,
        pages: summaries,
        skipped_pages,
    })
}

/// Parse a page selection such as `4`, `4-14` or `17,19` into sorted,
/// de-duplicated 1-based page numbers.
pub fn parse_page_selection(input: &str) -> Result<Vec<usize>, HerbariumError> {
    let invalid = || HerbariumError::InvalidPages(input.to_string());
    let number = |s: &str| -> Result<usize, HerbariumError> {
        match s.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(invalid()),
        }
    };

    let mut pages = Vec::new();
    for part in input.split(',') {
        match part.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                pages.extend(start..=end);
            }
            None => pages.push(number(part)?),
        }
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_selection() {
        assert_eq!(parse_page_selection("4").unwrap(), vec![4]);
        assert_eq!(parse_page_selection("4-7").unwrap(), vec![4, 5, 6, 7]);
        assert_eq!(parse_page_selection("19, 17,18-19").unwrap(), vec![17, 18, 19]);
    }

    #[test]
    fn test_parse_page_selection_rejects_garbage() {
        for bad in ["", "0", "a", "7-4", "3-", "1,,2"] {
            assert!(
                matches!(parse_page_selection(bad), Err(HerbariumError::InvalidPages(_))),
                "{bad} should be rejected"
            );
        }
    }
}
