use herbarium_core::extraction::{PageContent, Positioned, PositionedItem};
use herbarium_core::model::Catalogue;

pub fn print_catalogues(catalogues: &[Catalogue]) {
    for (i, catalogue) in catalogues.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("=== {} ===\n", catalogue.category);

        if catalogue.records.is_empty() {
            println!("  No plants found.");
        } else {
            let sci_width = catalogue
                .records
                .iter()
                .map(|r| r.scientific_name.chars().count())
                .max()
                .unwrap_or(15)
                .max("Scientific name".len());
            let common_width = catalogue
                .records
                .iter()
                .map(|r| r.common_name.chars().count())
                .max()
                .unwrap_or(11)
                .max("Common name".len());

            println!(
                "  {:>4}  {:>4}  {:<sci$}  {:<common$}  Image",
                "Id",
                "Page",
                "Scientific name",
                "Common name",
                sci = sci_width,
                common = common_width
            );
            for r in &catalogue.records {
                let page = r.page.map(|p| p.to_string()).unwrap_or_default();
                let image = r
                    .image_reference
                    .as_ref()
                    .map(|img| img.filename.as_str())
                    .unwrap_or("-");
                println!(
                    "  {:>4}  {:>4}  {:<sci$}  {:<common$}  {}",
                    r.sequence_id,
                    page,
                    r.scientific_name,
                    r.common_name,
                    image,
                    sci = sci_width,
                    common = common_width
                );
            }
        }

        println!();
        println!(
            "  {} plants, {} with images",
            catalogue.records.len(),
            catalogue.image_count()
        );
        for summary in &catalogue.pages {
            println!(
                "    page {:>3}: {} records ({} labels, {} images)",
                summary.page, summary.records, summary.labels, summary.images
            );
        }
        if !catalogue.skipped_pages.is_empty() {
            let skipped: Vec<String> = catalogue
                .skipped_pages
                .iter()
                .map(|p| p.to_string())
                .collect();
            println!("  Skipped pages (no heading): {}", skipped.join(", "));
        }
    }
}

pub fn print_page(page: &PageContent) {
    println!("=== Page {} ===\n", page.page_number);
    println!("  {:<6} {:>8} {:>8} {:>8}  Content", "Kind", "x", "y", "x_end");

    let mut items: Vec<&PositionedItem> = page.items.iter().collect();
    items.sort_by(|a, b| a.y().total_cmp(&b.y()).then(a.x().total_cmp(&b.x())));

    for item in items {
        match item {
            PositionedItem::Text(t) => println!(
                "  {:<6} {:>8.1} {:>8.1} {:>8.1}  {:?}",
                "text", t.x, t.y, t.x_end, t.text
            ),
            PositionedItem::Image(img) => println!(
                "  {:<6} {:>8.1} {:>8.1} {:>8}  {} bytes ({})",
                "image",
                img.x,
                img.y,
                "",
                img.byte_len(),
                img.format
            ),
        }
    }

    println!();
    println!(
        "  {} text spans, {} images",
        page.text_spans().count(),
        page.image_spans().count()
    );
}
