use herbarium_core::error::HerbariumError;
use herbarium_core::extraction::pdftohtml::PdftohtmlExtractor;
use herbarium_core::extraction::PdfExtractor;
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, page: usize, output_format: &str) -> Result<(), HerbariumError> {
    if page == 0 {
        return Err(HerbariumError::InvalidPages(page.to_string()));
    }
    if !PdftohtmlExtractor::is_available() {
        return Err(HerbariumError::PdftohtmlNotFound);
    }

    let pdf_bytes = std::fs::read(&input_file)?;
    let extractor = PdftohtmlExtractor::new();
    let pages = extractor.extract_pages(&pdf_bytes, &[page])?;

    let Some(content) = pages.into_iter().find(|p| p.page_number == page) else {
        return Err(HerbariumError::Extraction(format!(
            "page {page} not found in {}",
            input_file.display()
        )));
    };

    match output_format {
        "json" => output::json::print(&content)?,
        _ => output::table::print_page(&content),
    }
    Ok(())
}
