use crate::extraction::TextSpan;
use crate::profile::schema::Thresholds;

/// When two neighbouring spans are fragments of one label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeRule {
    pub max_dy: f32,
    /// Inclusive; slightly negative to tolerate overlapping glyph boxes.
    pub min_gap: f32,
    /// Exclusive; anything wider is a real word break.
    pub max_gap: f32,
}

impl Default for MergeRule {
    fn default() -> Self {
        MergeRule::from(&Thresholds::default())
    }
}

impl From<&Thresholds> for MergeRule {
    fn from(t: &Thresholds) -> Self {
        MergeRule {
            max_dy: t.merge_y,
            min_gap: t.merge_gap_min,
            max_gap: t.merge_gap_max,
        }
    }
}

impl MergeRule {
    fn joins(&self, current: &TextSpan, next: &TextSpan) -> bool {
        let dy = (next.y - current.y).abs();
        let gap = next.x - current.x_end;
        dy < self.max_dy && gap >= self.min_gap && gap < self.max_gap
    }
}

/// Order spans by line (rounded `y`, ties to even) then by `x`.
pub fn sort_for_merge(spans: &mut [TextSpan]) {
    spans.sort_by(|a, b| {
        a.y.round_ties_even()
            .total_cmp(&b.y.round_ties_even())
            .then(a.x.total_cmp(&b.x))
    });
}

/// Glue split glyph runs (e.g. a styled capital) back into one label.
///
/// Expects spans in `sort_for_merge` order. Single greedy pass: each span
/// either extends the label before it or starts a new one. Text is joined
/// without a separator; the label keeps its first fragment's position.
pub fn merge_adjacent_text_spans(spans: Vec<TextSpan>, rule: &MergeRule) -> Vec<TextSpan> {
    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(current) = merged.last_mut() {
            if rule.joins(current, &span) {
                current.text.push_str(&span.text);
                current.x_end = span.x_end;
                continue;
            }
        }
        merged.push(span);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, x_end: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, x_end, y)
    }

    #[test]
    fn test_split_capital_is_rejoined() {
        let spans = vec![
            span("G", 50.0, 58.0, 300.0),
            span("olden Dewdrop", 58.5, 130.0, 300.4),
        ];
        let merged = merge_adjacent_text_spans(spans, &MergeRule::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Golden Dewdrop");
        assert_eq!(merged[0].x, 50.0);
        assert_eq!(merged[0].x_end, 130.0);
    }

    #[test]
    fn test_fragments_concatenate_without_separator() {
        let mut spans = vec![
            span("cumini", 141.0, 180.0, 100.2),
            span("Syzygium", 90.0, 140.0, 100.0),
        ];
        sort_for_merge(&mut spans);
        let merged = merge_adjacent_text_spans(spans, &MergeRule::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Syzygiumcumini");
    }

    #[test]
    fn test_word_gap_does_not_merge() {
        let spans = vec![
            span("Mangifera", 90.0, 140.0, 100.0),
            span("indica", 145.0, 180.0, 100.0),
        ];
        let merged = merge_adjacent_text_spans(spans, &MergeRule::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_overlap_tolerance() {
        let rule = MergeRule::default();
        let overlapping = vec![span("Ab", 0.0, 20.0, 0.0), span("c", 18.0, 25.0, 0.0)];
        assert_eq!(merge_adjacent_text_spans(overlapping, &rule).len(), 1);

        let too_far_back = vec![span("Ab", 0.0, 20.0, 0.0), span("c", 17.9, 25.0, 0.0)];
        assert_eq!(merge_adjacent_text_spans(too_far_back, &rule).len(), 2);
    }

    #[test]
    fn test_different_lines_do_not_merge() {
        let spans = vec![
            span("Canna indica", 40.0, 100.0, 200.0),
            span("Canna", 100.0, 130.0, 215.0),
        ];
        let merged = merge_adjacent_text_spans(spans, &MergeRule::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_chains_across_several_fragments() {
        let spans = vec![
            span("Bou", 0.0, 20.0, 10.0),
            span("gain", 21.0, 40.0, 10.0),
            span("villea", 41.0, 70.0, 10.0),
        ];
        let merged = merge_adjacent_text_spans(spans, &MergeRule::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Bougainvillea");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut spans = vec![
            span("S", 40.0, 48.0, 100.0),
            span("yzygium cumini", 48.0, 120.0, 100.0),
            span("Jamun", 40.0, 70.0, 115.0),
            span("Hibiscus", 300.0, 350.0, 100.5),
            span("rosa-sinensis", 356.0, 420.0, 100.5),
            span("Shoe flower", 300.0, 360.0, 116.0),
        ];
        sort_for_merge(&mut spans);
        let rule = MergeRule::default();
        let once = merge_adjacent_text_spans(spans, &rule);

        let mut again = once.clone();
        sort_for_merge(&mut again);
        let twice = merge_adjacent_text_spans(again, &rule);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_for_merge_rounds_half_to_even() {
        // 100.5 rounds to 100, so it shares a line with 100.0 and sorts by x.
        let mut spans = vec![span("b", 50.0, 60.0, 100.0), span("a", 10.0, 20.0, 100.5)];
        sort_for_merge(&mut spans);
        assert_eq!(spans[0].text, "a");
    }
}
