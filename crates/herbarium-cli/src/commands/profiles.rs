use herbarium_core::error::HerbariumError;
use herbarium_core::profile::builtin;
use herbarium_core::profile::schema::{CategoryMode, MatchPolicy, Region, UnpairedPolicy};

pub fn list() -> Result<(), HerbariumError> {
    println!("Available category profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        println!(
            "  {:<18} {} (pages {})",
            name,
            profile.category,
            format_pages(&profile.pages)
        );
        if let Some(ref desc) = profile.description {
            println!("                     {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(name: &str) -> Result<(), HerbariumError> {
    let profile = builtin::load_preset(name)?;
    let t = &profile.thresholds;

    println!("{} ({})\n", profile.name, profile.slug);
    if let Some(ref desc) = profile.description {
        println!("{}\n", desc);
    }

    println!("  Category:   {}", profile.category);
    println!("  Pages:      {}", format_pages(&profile.pages));
    let mode = match profile.mode {
        CategoryMode::Paired => "paired (scientific name above common name)",
        CategoryMode::SingleLabel => "single label (each line is one record)",
        CategoryMode::NoLabel => "no label (images only)",
    };
    println!("  Mode:       {mode}");
    let matching = match profile.match_policy {
        MatchPolicy::Index => "by index in reading order".to_string(),
        MatchPolicy::Nearest => format!(
            "nearest by x, image above label + {}pt",
            t.nearest_margin
        ),
    };
    println!("  Images:     {matching}");
    println!("  Region:     {}", format_region(&profile.region));
    for pr in &profile.page_regions {
        println!("    page {}:  {}", pr.page, format_region(&pr.region));
    }
    if !profile.headings.is_empty() {
        let required = if profile.require_heading { " (required)" } else { "" };
        println!("  Headings:   {}{}", profile.headings.join(", "), required);
    }
    if let Some(ref genus) = profile.generic_scientific_name {
        println!("  Genus:      {genus}");
    }
    if let Some(ref label) = profile.synthesized_label {
        println!("  Names:      \"{label} 1\", \"{label} 2\", ...");
    }
    if profile.mode == CategoryMode::Paired {
        let unpaired = match profile.unpaired {
            UnpairedPolicy::Drop => "dropped",
            UnpairedPolicy::Keep => "kept with common name \"Unknown\"",
        };
        println!("  Unpaired:   {unpaired}");
    }
    if let Some(c) = &profile.continuation {
        println!(
            "  Wrapping:   join next line {}..{}pt below, |dx| < {}",
            c.min_dy, c.max_dy, c.max_dx
        );
        if let Some(ref prefix) = c.new_entry_prefix {
            println!("  New entry:  lines starting with \"{prefix}\"");
        }
    }

    if !profile.skip_patterns.is_empty() {
        println!("\nSkipped lines:");
        for p in &profile.skip_patterns {
            println!("  {p}");
        }
    }

    println!("\nThresholds (pt):");
    println!("  image rows         {}", t.image_row_y);
    println!("  label rows         {}", t.label_row_y);
    println!("  column width       {}", t.column_x);
    println!("  pair gap           {} < dy < {}", t.pair_min_y, t.pair_y);
    println!(
        "  fragment merge     dy < {}, {} <= gap < {}",
        t.merge_y, t.merge_gap_min, t.merge_gap_max
    );
    println!("  min image size     {} bytes", t.min_image_bytes);

    Ok(())
}

fn format_pages(pages: &[usize]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut iter = pages.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(next) = iter.next_if(|&n| n == end + 1) {
            end = next;
        }
        runs.push(if start == end {
            start.to_string()
        } else {
            format!("{start}-{end}")
        });
    }
    runs.join(",")
}

fn format_region(region: &Region) -> String {
    match (region.min_y, region.max_y) {
        (None, None) => "whole page".to_string(),
        (Some(min), None) => format!("y >= {min}"),
        (None, Some(max)) => format!("y <= {max}"),
        (Some(min), Some(max)) => format!("{min} <= y <= {max}"),
    }
}
