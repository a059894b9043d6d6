use crate::extraction::Positioned;

/// Items sharing an approximate `y`, ordered left to right.
pub type Row<T> = Vec<T>;

/// Group items into visual rows.
///
/// Items are visited top to bottom. An item opens a new row when it sits at
/// least `y_threshold` below the row's anchor, the first item placed in that
/// row. The anchor never moves, so a chain of small steps can carry a row
/// further than `y_threshold` from its last member but never from its anchor.
/// Both sorts are stable: ties keep their input order.
pub fn cluster_into_rows<T: Positioned>(mut items: Vec<T>, y_threshold: f32) -> Vec<Row<T>> {
    items.sort_by(|a, b| a.y().total_cmp(&b.y()));

    let mut rows: Vec<Row<T>> = Vec::new();
    let mut anchor_y = 0.0_f32;

    for item in items {
        let y = item.y();
        let near_anchor = y - anchor_y < y_threshold;
        if rows.is_empty() || !near_anchor {
            anchor_y = y;
            rows.push(vec![item]);
        } else if let Some(row) = rows.last_mut() {
            row.push(item);
        }
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x().total_cmp(&b.x()));
    }

    rows
}

/// Flatten rows into reading order.
pub fn flatten_rows<T>(rows: Vec<Row<T>>) -> Vec<T> {
    rows.into_iter().flatten().collect()
}
