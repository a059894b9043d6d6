use crate::extraction::TextSpan;
use crate::layout::LabelEntry;
use crate::profile::schema::{Continuation, Thresholds};

/// Text spans sharing an approximate `x`, ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// `x` of the span that opened the column.
    pub anchor_x: f32,
    pub items: Vec<TextSpan>,
}

/// Column grouping and the vertical window of a name pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairRule {
    pub column_x: f32,
    pub min_dy: f32,
    pub max_dy: f32,
}

impl Default for PairRule {
    fn default() -> Self {
        PairRule::from(&Thresholds::default())
    }
}

impl From<&Thresholds> for PairRule {
    fn from(t: &Thresholds) -> Self {
        PairRule {
            column_x: t.column_x,
            min_dy: t.pair_min_y,
            max_dy: t.pair_y,
        }
    }
}

impl PairRule {
    fn stacks(&self, upper: &TextSpan, lower: &TextSpan) -> bool {
        let dy = lower.y - upper.y;
        dy > self.min_dy && dy < self.max_dy
    }
}

/// Result of pairing one page's labels.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    pub labels: Vec<LabelEntry>,
    /// Lines that found no partner, in column order.
    pub unpaired: Vec<TextSpan>,
}

/// Assign spans to columns, first match wins.
///
/// Each span joins the first column whose anchor is within `column_x` of
/// it, otherwise it opens a new column. Columns come back sorted left to
/// right with their spans sorted top to bottom.
pub fn group_into_columns(spans: Vec<TextSpan>, column_x: f32) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();

    for span in spans {
        match columns
            .iter()
            .position(|c| (c.anchor_x - span.x).abs() < column_x)
        {
            Some(i) => columns[i].items.push(span),
            None => columns.push(Column {
                anchor_x: span.x,
                items: vec![span],
            }),
        }
    }

    for column in &mut columns {
        column.items.sort_by(|a, b| a.y.total_cmp(&b.y));
    }
    columns.sort_by(|a, b| a.anchor_x.total_cmp(&b.anchor_x));

    columns
}

/// Pair scientific names with the common name printed just below them.
///
/// Within each column, consecutive lines closer than the pair window form a
/// record and are both consumed; otherwise the upper line is left unpaired
/// and pairing resumes from the next line.
pub fn pair_names_by_column(spans: Vec<TextSpan>, rule: &PairRule) -> Pairing {
    let mut pairing = Pairing::default();

    for column in group_into_columns(spans, rule.column_x) {
        let anchor_x = column.anchor_x;
        let mut lines = column.items.into_iter().peekable();

        while let Some(upper) = lines.next() {
            let stacked = lines.peek().is_some_and(|lower| rule.stacks(&upper, lower));
            match lines.next_if(|_| stacked) {
                Some(lower) => pairing.labels.push(LabelEntry {
                    scientific_name: upper.text,
                    common_name: lower.text,
                    x: anchor_x,
                    y: upper.y,
                }),
                None => pairing.unpaired.push(upper),
            }
        }
    }

    pairing
}

/// Shortest and longest (in characters) line accepted as a standalone label.
const LABEL_MIN_CHARS: usize = 3;
const LABEL_MAX_CHARS: usize = 59;

/// Turn every qualifying line into a label of its own.
///
/// With a continuation window, the nearest unused line below a label that
/// falls inside the window is appended to it (space-joined), at most once.
/// A line opening with the window's `new_entry_prefix` is never appended,
/// and a label holding that prefix more than once is split into one entry
/// per occurrence at the same position. Spans must be in `sort_for_merge`
/// order.
pub fn single_labels(
    spans: Vec<TextSpan>,
    continuation: Option<&Continuation>,
    generic_scientific_name: Option<&str>,
) -> Vec<LabelEntry> {
    let lines: Vec<TextSpan> = spans
        .into_iter()
        .filter(|s| (LABEL_MIN_CHARS..=LABEL_MAX_CHARS).contains(&s.text.chars().count()))
        .collect();
    let prefix = continuation
        .and_then(|c| c.new_entry_prefix.as_deref())
        .filter(|p| !p.is_empty());

    let mut used = vec![false; lines.len()];
    let mut labels = Vec::with_capacity(lines.len());

    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let head = &lines[i];
        let mut text = head.text.clone();

        if let Some(window) = continuation {
            for j in (i + 1)..lines.len() {
                if used[j] {
                    continue;
                }
                let next = &lines[j];
                let dy = next.y - head.y;
                if dy > window.max_dy {
                    break;
                }
                if prefix.is_some_and(|p| next.text.starts_with(p)) {
                    continue;
                }
                if dy >= window.min_dy && (next.x - head.x).abs() < window.max_dx {
                    text.push(' ');
                    text.push_str(&next.text);
                    used[j] = true;
                    break;
                }
            }
        }

        let names = match prefix {
            Some(p) => split_on_prefix(&text, p),
            None => vec![text],
        };
        for name in names {
            labels.push(LabelEntry {
                scientific_name: generic_scientific_name
                    .map(str::to_string)
                    .unwrap_or_else(|| name.clone()),
                common_name: name,
                x: head.x,
                y: head.y,
            });
        }
    }

    labels
}

/// Split text that holds `prefix` more than once into one name per
/// occurrence, e.g. two neighbouring cultivar labels merged into one line.
fn split_on_prefix(text: &str, prefix: &str) -> Vec<String> {
    let starts: Vec<usize> = text.match_indices(prefix).map(|(i, _)| i).collect();
    if starts.len() < 2 {
        return vec![text.to_string()];
    }

    let mut names = Vec::with_capacity(starts.len() + 1);
    let lead = text[..starts[0]].trim();
    if !lead.is_empty() {
        names.push(lead.to_string());
    }
    for (k, &start) in starts.iter().enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(text.len());
        let rest = text[start + prefix.len()..end].trim();
        names.push(if rest.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix} {rest}")
        });
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, x + 8.0 * text.len() as f32, y)
    }

    #[test]
    fn test_columns_first_match_and_sorted() {
        let spans = vec![
            span("c", 300.0, 10.0),
            span("a2", 45.0, 40.0),
            span("a1", 40.0, 20.0),
            span("b", 150.0, 10.0),
        ];
        let columns = group_into_columns(spans, 60.0);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].anchor_x, 45.0);
        let texts: Vec<&str> = columns[0].items.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a1", "a2"]);
        assert_eq!(columns[1].anchor_x, 150.0);
        assert_eq!(columns[2].anchor_x, 300.0);
    }

    #[test]
    fn test_column_anchor_does_not_follow_members() {
        // 100 joins the column at 50; 155 is within 60 of 100 but not of 50.
        let spans = vec![span("a", 50.0, 0.0), span("b", 100.0, 20.0), span("c", 155.0, 40.0)];
        let columns = group_into_columns(spans, 60.0);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].items.len(), 2);
    }

    #[test]
    fn test_pair_scientific_and_common_name() {
        let spans = vec![span("Mangifera indica", 100.0, 200.0), span("Mango", 100.0, 215.0)];
        let pairing = pair_names_by_column(spans, &PairRule::default());
        assert_eq!(pairing.labels.len(), 1);
        assert_eq!(pairing.labels[0].scientific_name, "Mangifera indica");
        assert_eq!(pairing.labels[0].common_name, "Mango");
        assert_eq!(pairing.labels[0].y, 200.0);
        assert!(pairing.unpaired.is_empty());
    }

    #[test]
    fn test_far_lines_are_not_paired() {
        let spans = vec![span("Mangifera indica", 100.0, 200.0), span("Mango", 100.0, 225.0)];
        let pairing = pair_names_by_column(spans, &PairRule::default());
        assert!(pairing.labels.is_empty());
        assert_eq!(pairing.unpaired.len(), 2);
    }

    #[test]
    fn test_same_height_lines_are_not_paired() {
        let spans = vec![span("Canna", 100.0, 200.0), span("indica", 110.0, 200.0)];
        let pairing = pair_names_by_column(spans, &PairRule::default());
        assert!(pairing.labels.is_empty());
    }

    #[test]
    fn test_orphan_line_skipped_then_pairing_resumes() {
        let spans = vec![
            span("Flowering Shrubs", 60.0, 80.0),
            span("Ixora coccinea", 60.0, 300.0),
            span("Jungle geranium", 62.0, 314.0),
            span("Hamelia patens", 61.0, 500.0),
            span("Firebush", 60.0, 513.0),
        ];
        let pairing = pair_names_by_column(spans, &PairRule::default());
        let names: Vec<&str> = pairing
            .labels
            .iter()
            .map(|l| l.common_name.as_str())
            .collect();
        assert_eq!(names, vec!["Jungle geranium", "Firebush"]);
        assert_eq!(pairing.unpaired.len(), 1);
        assert_eq!(pairing.unpaired[0].text, "Flowering Shrubs");
    }

    #[test]
    fn test_pair_min_gap_excludes_close_lines() {
        let rule = PairRule {
            column_x: 60.0,
            min_dy: 5.0,
            max_dy: 30.0,
        };
        let spans = vec![span("Ocimum", 40.0, 100.0), span("tenuiflorum", 40.0, 104.0)];
        assert!(pair_names_by_column(spans, &rule).labels.is_empty());
    }

    #[test]
    fn test_pairs_come_out_column_by_column() {
        let spans = vec![
            span("Right sci", 400.0, 100.0),
            span("Right common", 400.0, 112.0),
            span("Left sci", 40.0, 100.0),
            span("Left common", 40.0, 112.0),
        ];
        let pairing = pair_names_by_column(spans, &PairRule::default());
        assert_eq!(pairing.labels[0].scientific_name, "Left sci");
        assert_eq!(pairing.labels[1].scientific_name, "Right sci");
        assert_eq!(pairing.labels[1].x, 400.0);
    }

    #[test]
    fn test_single_labels_with_generic_genus() {
        let spans = vec![span("Grand Nain", 40.0, 400.0), span("Red Banana", 240.0, 400.0)];
        let labels = single_labels(spans, None, Some("Musa"));
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].scientific_name, "Musa");
        assert_eq!(labels[0].common_name, "Grand Nain");
    }

    #[test]
    fn test_single_labels_join_continuation_line() {
        let window = Continuation::default();
        let spans = vec![
            span("Dwarf", 40.0, 400.0),
            span("Cavendish", 250.0, 400.0),
            span("Cavendish", 42.0, 414.0),
            span("Poovan", 40.0, 600.0),
        ];
        let labels = single_labels(spans, Some(&window), None);
        let names: Vec<&str> = labels.iter().map(|l| l.common_name.as_str()).collect();
        assert_eq!(names, vec!["Dwarf Cavendish", "Cavendish", "Poovan"]);
        assert_eq!(labels[0].scientific_name, "Dwarf Cavendish");
    }

    #[test]
    fn test_single_labels_take_one_continuation_only() {
        let window = Continuation::default();
        let spans = vec![
            span("Philodendron", 40.0, 400.0),
            span("Xanadu", 40.0, 412.0),
            span("Compact", 40.0, 424.0),
        ];
        let labels = single_labels(spans, Some(&window), None);
        let names: Vec<&str> = labels.iter().map(|l| l.common_name.as_str()).collect();
        assert_eq!(names, vec!["Philodendron Xanadu", "Compact"]);
    }

    #[test]
    fn test_single_labels_drop_page_numbers_and_long_lines() {
        let long = "x".repeat(60);
        let spans = vec![
            span("12", 500.0, 800.0),
            span(&long, 40.0, 100.0),
            span("Rubra", 40.0, 300.0),
        ];
        let labels = single_labels(spans, None, Some("Plumeria"));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].common_name, "Rubra");
    }
    fn genus_window() -> Continuation {
        Continuation {
            new_entry_prefix: Some("Philodendron".to_string()),
            ..Continuation::default()
        }
    }

    #[test]
    fn test_prefixed_line_is_not_a_continuation() {
        let spans = vec![
            span("Philodendron Selloum", 40.0, 400.0),
            span("Philodendron Xanadu", 40.0, 412.0),
            span("Tree philodendron", 42.0, 424.0),
        ];
        let labels = single_labels(spans, Some(&genus_window()), None);
        let names: Vec<&str> = labels.iter().map(|l| l.common_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Philodendron Selloum Tree philodendron", "Philodendron Xanadu"]
        );
    }

    #[test]
    fn test_merged_prefix_labels_are_split() {
        let spans = vec![
            span("Philodendron burle marx Philodendron ceylon gold", 40.0, 400.0),
            span("Philodendron Xanadu", 40.0, 600.0),
            span("Philodendron Birkin", 40.0, 612.0),
        ];
        let labels = single_labels(spans, Some(&genus_window()), None);
        let names: Vec<&str> = labels.iter().map(|l| l.scientific_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Philodendron burle marx",
                "Philodendron ceylon gold",
                "Philodendron Xanadu",
                "Philodendron Birkin",
            ]
        );
        assert_eq!(labels[1].x, 40.0);
        assert_eq!(labels[1].y, 400.0);
    }

    #[test]
    fn test_split_keeps_leading_text_and_spaces_glued_names() {
        assert_eq!(
            split_on_prefix("Red PhilodendronCongo Philodendron", "Philodendron"),
            vec!["Red", "Philodendron Congo", "Philodendron"]
        );
        assert_eq!(
            split_on_prefix("Philodendron Xanadu", "Philodendron"),
            vec!["Philodendron Xanadu"]
        );
    }
}
