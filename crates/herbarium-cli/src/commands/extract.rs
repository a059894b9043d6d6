use herbarium_core::error::HerbariumError;
use herbarium_core::extraction::pdftohtml::PdftohtmlExtractor;
use herbarium_core::model::Catalogue;
use herbarium_core::profile::builtin;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    profile_names: Vec<String>,
    pages: Option<String>,
    output_format: &str,
    out_dir: Option<PathBuf>,
    url_root: &str,
) -> Result<(), HerbariumError> {
    // Default to every built-in category
    let names: Vec<String> = if profile_names.is_empty() {
        builtin::PRESETS.iter().map(|s| s.to_string()).collect()
    } else {
        profile_names
    };
    let profiles = names
        .iter()
        .map(|name| builtin::load_preset(name))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("profiles: {}", names.join(", "));

    let page_override = pages
        .as_deref()
        .map(herbarium_core::parse_page_selection)
        .transpose()?;

    if !PdftohtmlExtractor::is_available() {
        return Err(HerbariumError::PdftohtmlNotFound);
    }
    let pdf_bytes = std::fs::read(&input_file)?;
    let extractor = PdftohtmlExtractor::new();

    let mut catalogues: Vec<Catalogue> = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        let catalogue = herbarium_core::extract_catalogue(
            &pdf_bytes,
            &extractor,
            profile,
            page_override.as_deref(),
        )?;
        catalogues.push(catalogue);
    }

    match out_dir {
        Some(dir) => {
            for catalogue in &catalogues {
                let path = herbarium_core::output::write_catalogue(catalogue, &dir, url_root)?;
                println!(
                    "{}: {} plants, {} images -> {}",
                    catalogue.category,
                    catalogue.records.len(),
                    catalogue.image_count(),
                    path.display()
                );
            }
            let index = herbarium_core::output::write_master_index(&catalogues, &dir, url_root)?;
            let total: usize = catalogues.iter().map(|c| c.records.len()).sum();
            println!("Total plants: {total} -> {}", index.display());
        }
        None => match output_format {
            "json" => output::json::print(&catalogues)?,
            _ => output::table::print_catalogues(&catalogues),
        },
    }

    Ok(())
}
