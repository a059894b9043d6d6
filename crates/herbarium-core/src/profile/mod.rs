pub mod builtin;
pub mod schema;

use crate::error::HerbariumError;
use regex::{Regex, RegexBuilder};
use schema::{CategoryMode, CategoryProfile, Region};

/// Parse a profile from a JSON string and validate it.
pub fn parse_profile_str(json: &str) -> Result<CategoryProfile, HerbariumError> {
    let profile: CategoryProfile = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &CategoryProfile) -> Result<(), HerbariumError> {
    let invalid = |reason: String| HerbariumError::ProfileInvalid {
        profile: profile.name.clone(),
        reason,
    };

    if profile.name.trim().is_empty() {
        return Err(invalid("name must not be empty".into()));
    }
    if profile.slug.trim().is_empty() {
        return Err(invalid("slug must not be empty".into()));
    }
    if profile
        .slug
        .chars()
        .any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'))
    {
        return Err(invalid(format!(
            "slug '{}' may only contain lowercase letters, digits, '_' and '-'",
            profile.slug
        )));
    }
    if profile.category.trim().is_empty() {
        return Err(invalid("category must not be empty".into()));
    }
    if profile.pages.is_empty() {
        return Err(invalid("pages must not be empty".into()));
    }
    if profile.pages.contains(&0) {
        return Err(invalid("page numbers are 1-based".into()));
    }

    let t = &profile.thresholds;
    let positive = [
        ("image_row_y", t.image_row_y),
        ("label_row_y", t.label_row_y),
        ("column_x", t.column_x),
        ("pair_y", t.pair_y),
        ("merge_y", t.merge_y),
        ("nearest_margin", t.nearest_margin),
    ];
    for (field, value) in positive {
        if value.is_nan() || value <= 0.0 {
            return Err(invalid(format!("threshold '{field}' must be positive")));
        }
    }
    if t.pair_min_y < 0.0 || t.pair_min_y >= t.pair_y {
        return Err(invalid(format!(
            "pair window {}..{} is empty",
            t.pair_min_y, t.pair_y
        )));
    }
    if t.merge_gap_min >= t.merge_gap_max {
        return Err(invalid(format!(
            "merge gap window {}..{} is empty",
            t.merge_gap_min, t.merge_gap_max
        )));
    }

    check_region(&profile.region).map_err(invalid)?;
    for page_region in &profile.page_regions {
        if !profile.pages.contains(&page_region.page) {
            return Err(invalid(format!(
                "page region for page {} which is not in pages",
                page_region.page
            )));
        }
        check_region(&page_region.region).map_err(invalid)?;
    }

    if profile.require_heading && profile.headings.is_empty() {
        return Err(invalid("require_heading is set but headings is empty".into()));
    }

    compile_patterns(&profile.skip_patterns).map_err(|e| invalid(e.to_string()))?;

    if profile.mode == CategoryMode::NoLabel
        && profile
            .synthesized_label
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
    {
        return Err(invalid("no_label mode requires synthesized_label".into()));
    }

    if let Some(c) = &profile.continuation {
        if c.min_dy < 0.0 || c.min_dy > c.max_dy || c.max_dx <= 0.0 {
            return Err(invalid(format!(
                "continuation window {}..{} (dx < {}) is invalid",
                c.min_dy, c.max_dy, c.max_dx
            )));
        }
        if c.new_entry_prefix.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(invalid("continuation new_entry_prefix is empty".into()));
        }
    }

    Ok(())
}

fn check_region(region: &Region) -> Result<(), String> {
    if let (Some(min), Some(max)) = (region.min_y, region.max_y) {
        if min > max {
            return Err(format!("region min_y {min} is above max_y {max}"));
        }
    }
    Ok(())
}

/// Compile skip patterns case-insensitively.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
        .collect()
}
