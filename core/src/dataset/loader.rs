use std::path::Path;

use super::table::RawTable;
use crate::error::DatasetError;

/// Field separator used by the training data; uploads must match it.
pub const DELIMITER: char = ';';

/// Cell contents that count as a missing value.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Read a `;`-delimited file with a header row.
pub fn load_dataset(path: &Path) -> Result<RawTable, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| DatasetError::Parse {
        line: 1,
        message: "file is not valid UTF-8".to_string(),
    })?;

    let table = parse_delimited(&text, DELIMITER)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "dataset loaded"
    );
    Ok(table)
}

/// Parse delimited text. Quoted fields may contain the delimiter, newlines and
/// `""` escapes. Blank lines are skipped and short rows are padded with
/// missing values; long rows are rejected.
pub fn parse_delimited(text: &str, delimiter: char) -> Result<RawTable, DatasetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text, delimiter)?.into_iter();

    let Some((_, header_fields)) = records.next() else {
        return Err(DatasetError::EmptyOrUnparsable);
    };
    let headers: Vec<String> = header_fields
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            if h.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                h
            }
        })
        .collect();

    let width = headers.len();
    let mut rows = Vec::new();
    for (line, fields) in records {
        if fields.len() > width {
            return Err(DatasetError::Parse {
                line,
                message: format!("expected {width} fields, saw {}", fields.len()),
            });
        }
        let mut row: Vec<Option<String>> = fields.into_iter().map(to_cell).collect();
        row.resize(width, None);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DatasetError::EmptyOrUnparsable);
    }

    Ok(RawTable::new(headers, rows))
}

fn to_cell(raw: String) -> Option<String> {
    if MISSING_TOKENS.contains(&raw.trim()) {
        None
    } else {
        Some(raw)
    }
}

/// Split text into records of fields, tagging each record with the line it
/// starts on. Blank lines produce no record.
fn split_records(text: &str, delimiter: char) -> Result<Vec<(usize, Vec<String>)>, DatasetError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut was_quoted = false;
    let mut line = 1usize;
    let mut record_line = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !was_quoted => {
                in_quotes = true;
                was_quoted = true;
            }
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields), was_quoted);
                was_quoted = false;
                line += 1;
                record_line = line;
            }
            c if c == delimiter => {
                fields.push(std::mem::take(&mut field));
                was_quoted = false;
            }
            c if was_quoted && !c.is_whitespace() => {
                return Err(DatasetError::Parse {
                    line,
                    message: format!("unexpected '{c}' after closing quote"),
                });
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err(DatasetError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }

    if !field.is_empty() || !fields.is_empty() || was_quoted {
        fields.push(field);
        push_record(&mut records, record_line, fields, was_quoted);
    }

    Ok(records)
}

fn push_record(
    records: &mut Vec<(usize, Vec<String>)>,
    line: usize,
    fields: Vec<String>,
    last_quoted: bool,
) {
    let blank = fields.len() == 1 && !last_quoted && fields[0].trim().is_empty();
    if !blank {
        records.push((line, fields));
    }
}
