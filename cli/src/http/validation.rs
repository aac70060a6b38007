//! Upload checks

use super::models::ApiError;

/// The upload's client-side name must end in `.csv` (case-sensitive).
pub fn is_csv_filename(name: &str) -> bool {
    name.ends_with(".csv")
}

pub fn validate_upload_name(name: Option<&str>) -> Result<(), ApiError> {
    match name {
        Some(name) if is_csv_filename(name) => Ok(()),
        _ => Err(ApiError::InvalidUpload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_names() {
        assert!(is_csv_filename("wine.csv"));
        assert!(is_csv_filename("batch.2024.csv"));
        assert!(!is_csv_filename("wine.txt"));
        assert!(!is_csv_filename("wine.csv.exe"));
        assert!(!is_csv_filename("WINE.CSV"));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(matches!(validate_upload_name(None), Err(ApiError::InvalidUpload)));
        assert!(validate_upload_name(Some("a.csv")).is_ok());
    }
}
