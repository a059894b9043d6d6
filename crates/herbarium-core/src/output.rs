use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::HerbariumError;
use crate::model::{Catalogue, CatalogueRecord};

pub const PLANTS_JSON: &str = "plants.json";
pub const README_MD: &str = "README.md";
/// Combined index of every written category, at the output root.
pub const MASTER_JSON: &str = "catalogue.json";

/// One entry of `plants.json`; `image` is a root-relative URL path.
#[derive(Debug, Serialize)]
struct PlantEntry<'a> {
    id: usize,
    scientific_name: &'a str,
    common_name: &'a str,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

/// Write a catalogue to `out_dir/<slug>/`: one file per image, `plants.json`
/// and a `README.md` summary. The category directory is recreated from
/// scratch. Returns the category directory.
pub fn write_catalogue(
    catalogue: &Catalogue,
    out_dir: &Path,
    url_root: &str,
) -> Result<PathBuf, HerbariumError> {
    let dir = out_dir.join(&catalogue.slug);
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    let mut entries = Vec::with_capacity(catalogue.records.len());
    for record in &catalogue.records {
        if let Some(img) = &record.image_reference {
            fs::write(dir.join(&img.filename), &img.bytes)?;
        }
        entries.push(PlantEntry::new(record, &catalogue.slug, url_root, record.sequence_id));
    }

    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(dir.join(PLANTS_JSON), json + "\n")?;
    fs::write(dir.join(README_MD), render_readme(catalogue))?;

    log::info!(
        "wrote {} records ({} images) to {}",
        catalogue.records.len(),
        catalogue.image_count(),
        dir.display()
    );
    Ok(dir)
}

/// Write `out_dir/catalogue.json` listing the records of every catalogue,
/// renumbered 1..N in the order given. Image paths point into the category
/// directories written by [`write_catalogue`]. Returns the file path.
pub fn write_master_index(
    catalogues: &[Catalogue],
    out_dir: &Path,
    url_root: &str,
) -> Result<PathBuf, HerbariumError> {
    fs::create_dir_all(out_dir)?;

    let entries: Vec<PlantEntry> = catalogues
        .iter()
        .flat_map(|c| c.records.iter().map(move |r| (c, r)))
        .enumerate()
        .map(|(i, (catalogue, record))| PlantEntry::new(record, &catalogue.slug, url_root, i + 1))
        .collect();

    let path = out_dir.join(MASTER_JSON);
    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(&path, json + "\n")?;

    log::info!(
        "wrote {} records from {} categories to {}",
        entries.len(),
        catalogues.len(),
        path.display()
    );
    Ok(path)
}

impl<'a> PlantEntry<'a> {
    fn new(record: &'a CatalogueRecord, slug: &str, url_root: &str, id: usize) -> Self {
        let root = url_root.trim_end_matches('/');
        PlantEntry {
            id,
            scientific_name: &record.scientific_name,
            common_name: &record.common_name,
            category: &record.category,
            page: record.page,
            image: record
                .image_reference
                .as_ref()
                .map(|img| format!("{root}/{slug}/{}", img.filename)),
        }
    }
}

fn render_readme(catalogue: &Catalogue) -> String {
    let mut out = format!(
        "# {}\n\nTotal plants: {}\nImages: {}\n\n",
        catalogue.category,
        catalogue.records.len(),
        catalogue.image_count()
    );
    out.push_str("| Scientific Name | Common Name |\n");
    out.push_str("|-----------------|-------------|\n");
    for record in &catalogue.records {
        out.push_str(&format!(
            "| *{}* | {} |\n",
            record.scientific_name, record.common_name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageReference;

    fn catalogue() -> Catalogue {
        Catalogue {
            profile: "Aquatic".into(),
            slug: "aquatic_plants".into(),
            category: "Aquatic Plants".into(),
            records: vec![
                CatalogueRecord {
                    sequence_id: 1,
                    scientific_name: "Nelumbo nucifera".into(),
                    common_name: "Lotus".into(),
                    category: "Aquatic Plants".into(),
                    page: Some(19),
                    image_reference: Some(ImageReference {
                        filename: "lotus.jpg".into(),
                        format: "jpg".into(),
                        bytes: vec![7; 16],
                    }),
                },
                CatalogueRecord {
                    sequence_id: 2,
                    scientific_name: "Pistia stratiotes".into(),
                    common_name: "Water lettuce".into(),
                    category: "Aquatic Plants".into(),
                    page: Some(19),
                    image_reference: None,
                },
            ],
            pages: vec![],
            skipped_pages: vec![],
        }
    }

    #[test]
    fn test_write_catalogue_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_catalogue(&catalogue(), tmp.path(), "/catalogue/").unwrap();
        assert_eq!(dir, tmp.path().join("aquatic_plants"));

        assert_eq!(fs::read(dir.join("lotus.jpg")).unwrap(), vec![7; 16]);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(PLANTS_JSON)).unwrap()).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["image"], "/catalogue/aquatic_plants/lotus.jpg");
        assert!(json[1].get("image").is_none());

        let readme = fs::read_to_string(dir.join(README_MD)).unwrap();
        assert!(readme.starts_with("# Aquatic Plants\n"));
        assert!(readme.contains("Total plants: 2"));
        assert!(readme.contains("Images: 1"));
        assert!(readme.contains("| *Pistia stratiotes* | Water lettuce |"));
    }

    #[test]
    fn test_write_catalogue_replaces_stale_files() {
        let tmp = tempfile::tempdir().unwrap();
        let stale = tmp.path().join("aquatic_plants").join("old.jpg");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        write_catalogue(&catalogue(), tmp.path(), "/catalogue").unwrap();
        assert!(!stale.exists());
    }
    #[test]
    fn test_readme_lists_every_record() {
        let readme = render_readme(&catalogue());
        assert_eq!(
            readme,
            "# Aquatic Plants\n\nTotal plants: 2\nImages: 1\n\n\
             | Scientific Name | Common Name |\n\
             |-----------------|-------------|\n\
             | *Nelumbo nucifera* | Lotus |\n\
             | *Pistia stratiotes* | Water lettuce |\n"
        );
    }

    #[test]
    fn test_master_index_numbers_across_categories() {
        let mut lilies = catalogue();
        lilies.slug = "water_lilies".into();
        lilies.records.truncate(1);

        let tmp = tempfile::tempdir().unwrap();
        let path = write_master_index(&[catalogue(), lilies], tmp.path(), "/catalogue").unwrap();
        assert_eq!(path, tmp.path().join(MASTER_JSON));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let ids: Vec<u64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(json[2]["image"], "/catalogue/water_lilies/lotus.jpg");
        assert_eq!(json[1]["common_name"], "Water lettuce");
    }
}
