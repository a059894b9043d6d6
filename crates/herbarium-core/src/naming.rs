use std::collections::HashSet;

const MAX_BASE_CHARS: usize = 50;
const FALLBACK_BASE: &str = "unknown";

/// Reduce a plant name to a filesystem-safe base name.
///
/// Keeps word characters, hyphens and whitespace, turns spaces into
/// underscores, lowercases, and caps the result at 50 characters.
pub fn safe_filename(name: &str) -> String {
    let base: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .map(|c| if c == ' ' { '_' } else { c })
        .flat_map(char::to_lowercase)
        .take(MAX_BASE_CHARS)
        .collect();

    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    }
}

/// Hands out filenames that are unique within one extraction run.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
    used: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base.ext`, or `base_1.ext`, `base_2.ext`, ... if taken.
    pub fn assign(&mut self, base: &str, ext: &str) -> String {
        let mut candidate = format!("{base}.{ext}");
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{counter}.{ext}");
            counter += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename_basic() {
        assert_eq!(safe_filename("Jungle geranium"), "jungle_geranium");
        assert_eq!(safe_filename("Hibiscus rosa-sinensis"), "hibiscus_rosa-sinensis");
    }

    #[test]
    fn test_safe_filename_strips_punctuation() {
        assert_eq!(safe_filename("Dracaena 'Lemon Lime' (var.)"), "dracaena_lemon_lime_var");
    }

    #[test]
    fn test_safe_filename_truncates() {
        let long = "a".repeat(80);
        assert_eq!(safe_filename(&long).chars().count(), 50);
    }

    #[test]
    fn test_safe_filename_falls_back_to_unknown() {
        assert_eq!(safe_filename("???"), "unknown");
        assert_eq!(safe_filename(""), "unknown");
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let mut names = FilenameAllocator::new();
        assert_eq!(names.assign("musa", "jpg"), "musa.jpg");
        assert_eq!(names.assign("musa", "jpg"), "musa_1.jpg");
        assert_eq!(names.assign("musa", "jpg"), "musa_2.jpg");
        assert_eq!(names.assign("musa", "png"), "musa.png");
    }

    #[test]
    fn test_suffix_skips_names_already_taken() {
        let mut names = FilenameAllocator::new();
        assert_eq!(names.assign("lotus_1", "jpg"), "lotus_1.jpg");
        assert_eq!(names.assign("lotus", "jpg"), "lotus.jpg");
        assert_eq!(names.assign("lotus", "jpg"), "lotus_2.jpg");
    }
}
