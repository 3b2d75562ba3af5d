//! Flat-table ingestion for the survey corpus.
//!
//! All field data arrives as comma-delimited text exported from the crew's
//! spreadsheets. Parsing is line-oriented: locate columns by header name,
//! split on commas, and map blank or sentinel cells to `None` so each
//! loader can apply its own raggedness policy.
//!
//! Submodules:
//! - `transects` — channel cross-section surveys (`Position`, `Normalized_Z`).
//! - `tables` — bed thickness, fracture spacing, fracture orientation, and
//!   rock strength tables, with their spreadsheet quirks.

pub mod tables;
pub mod transects;

use crate::model::SurveyError;

/// Finds the index of a named column in a header line.
pub(crate) fn column_index(
    header: &str,
    column: &str,
    file: &str,
) -> Result<usize, SurveyError> {
    header
        .split(',')
        .position(|h| h.trim() == column)
        .ok_or_else(|| SurveyError::MissingColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

/// Parses one cell as a number. Blank cells and the spreadsheet NaN
/// spellings come back as `None`; anything else unparseable is `Some(Err)`.
pub(crate) fn parse_cell(cell: &str) -> Option<Result<f64, ()>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(Ok(v)),
        _ => Some(Err(())),
    }
}
