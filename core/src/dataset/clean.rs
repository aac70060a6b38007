use super::table::RawTable;

/// `"fixed acidity"` → `"FixedAcidity"`: split on whitespace, upper-case the
/// first letter of each word, join without separator.
pub fn format_feature_name(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Drop every row holding a missing value and normalise the headers.
///
/// No imputation happens at inference time. Running this twice is a no-op.
pub fn clean(table: RawTable) -> RawTable {
    let before = table.len();
    let headers = table
        .headers
        .iter()
        .map(|h| format_feature_name(h))
        .collect();
    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|row| row.iter().all(Option::is_some))
        .collect();

    let dropped = before - rows.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = rows.len(), "dropped rows with missing values");
    }

    RawTable::new(headers, rows)
}
