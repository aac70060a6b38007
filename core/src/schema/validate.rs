use std::fmt;

use serde::Serialize;

use super::sample::{FieldKind, WineSample, FIELDS};
use crate::dataset::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    FloatParsing,
    IntParsing,
}

/// One failed check on one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Zero-based position in the cleaned table.
    pub row: usize,
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Every field failure found in a rejected batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.errors).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn mentions_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        if let Some(first) = self.errors.first() {
            write!(f, "; row {} field {}: {}", first.row, first.field, first.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Rows that passed validation, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedBatch {
    pub rows: Vec<WineSample>,
}

impl ValidatedBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

enum Cell {
    Float(f64),
    Int(i64),
    Text(String),
}

/// Validate every row of a cleaned table.
///
/// All-or-nothing: a single bad field anywhere rejects the whole batch and
/// the report lists every failure found.
pub fn validate(table: &RawTable) -> Result<ValidatedBatch, ValidationReport> {
    let columns: Vec<Option<usize>> = FIELDS
        .iter()
        .map(|spec| table.column_index(spec.name))
        .collect();

    let mut rows = Vec::with_capacity(table.len());
    let mut errors = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(FIELDS.len());
        let mut row_ok = true;

        for (spec, column) in FIELDS.iter().zip(&columns) {
            let raw = column.and_then(|idx| row.get(idx)).and_then(|c| c.as_deref());
            match parse_cell(spec.kind, raw) {
                Ok(cell) => cells.push(cell),
                Err((kind, msg)) => {
                    row_ok = false;
                    errors.push(FieldError {
                        row: row_idx,
                        field: spec.name.to_string(),
                        kind,
                        msg,
                        input: raw.map(str::to_string),
                    });
                }
            }
        }

        if row_ok {
            rows.push(build_sample(cells));
        }
    }

    if errors.is_empty() {
        Ok(ValidatedBatch { rows })
    } else {
        tracing::debug!(
            errors = errors.len(),
            rows = table.len(),
            "batch rejected by schema validation"
        );
        Err(ValidationReport { errors })
    }
}

fn parse_cell(kind: FieldKind, raw: Option<&str>) -> Result<Cell, (FieldErrorKind, String)> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err((FieldErrorKind::Missing, "Field required".to_string()));
    };

    match kind {
        FieldKind::Float => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Cell::Float(v)),
            _ => Err((
                FieldErrorKind::FloatParsing,
                "Input should be a valid number".to_string(),
            )),
        },
        FieldKind::Integer => parse_integer(raw).map(Cell::Int).ok_or((
            FieldErrorKind::IntParsing,
            "Input should be a valid integer".to_string(),
        )),
        FieldKind::Text => Ok(Cell::Text(raw.to_string())),
    }
}

/// Accepts `"5"` and integral floats such as `"5.0"`; rejects `"5.5"`.
fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn build_sample(cells: Vec<Cell>) -> WineSample {
    let mut floats = [0.0f64; 11];
    let mut quality = 0i64;
    let mut color = String::new();
    let mut next_float = 0;

    // Cells arrive in FIELDS order: 11 floats, Quality, Color.
    for cell in cells {
        match cell {
            Cell::Float(v) => {
                floats[next_float] = v;
                next_float += 1;
            }
            Cell::Int(v) => quality = v,
            Cell::Text(v) => color = v,
        }
    }

    WineSample {
        fixed_acidity: floats[0],
        volatile_acidity: floats[1],
        citric_acid: floats[2],
        residual_sugar: floats[3],
        chlorides: floats[4],
        free_sulfur_dioxide: floats[5],
        total_sulfur_dioxide: floats[6],
        density: floats[7],
        ph: floats[8],
        sulphates: floats[9],
        alcohol: floats[10],
        quality,
        color,
    }
}
