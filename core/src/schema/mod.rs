//! Strict per-row input schema for wine samples.

mod sample;
mod validate;

pub use sample::{FeatureValue, FieldKind, FieldSpec, WineSample, FIELDS, FIELD_NAMES};
pub use validate::{validate, FieldError, FieldErrorKind, ValidatedBatch, ValidationReport};
