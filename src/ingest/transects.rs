//! Cross-section survey CSV loading.
//!
//! One file per transect, one row per surveyed point, columns `Position`
//! (along-transect distance, m) and `Normalized_Z` (elevation above the
//! thalweg, m). No schema validation beyond requiring both columns and at
//! least two data rows; extra columns from the field spreadsheets are
//! ignored.

use std::path::Path;

use crate::ingest::{column_index, parse_cell};
use crate::model::{CrossSectionSurvey, SurveyError, SurveyPoint};
use crate::surveys::{self, Transect};

/// Parses cross-section CSV content into survey points.
///
/// Rows where both cells are blank are skipped (trailing spreadsheet rows);
/// a row with exactly one parseable cell is a `Parse` error, since a
/// half-recorded point would silently shift the profile.
pub fn parse_transect_csv(file: &str, content: &str) -> Result<Vec<SurveyPoint>, SurveyError> {
    let mut lines = content.lines();
    let header = lines.next().ok_or_else(|| SurveyError::InvalidSurvey(format!(
        "{}: empty file",
        file
    )))?;
    let pos_col = column_index(header, "Position", file)?;
    let z_col = column_index(header, "Normalized_Z", file)?;

    let mut points = Vec::new();
    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        let pos = cells.get(pos_col).and_then(|c| parse_cell(c));
        let z = cells.get(z_col).and_then(|c| parse_cell(c));
        match (pos, z) {
            (Some(Ok(position)), Some(Ok(elevation))) => {
                points.push(SurveyPoint { position, elevation });
            }
            (None, None) => continue,
            _ => {
                return Err(SurveyError::Parse {
                    file: file.to_string(),
                    // +2: one for the header, one for 1-based numbering
                    line: line_num + 2,
                    message: "row does not hold a (Position, Normalized_Z) pair".to_string(),
                });
            }
        }
    }

    if points.len() < 2 {
        return Err(SurveyError::InvalidSurvey(format!(
            "{}: need at least 2 surveyed points, got {}",
            file,
            points.len()
        )));
    }
    Ok(points)
}

/// Loads one registered transect from `dir`.
pub fn load_transect(dir: &Path, transect: &Transect) -> Result<CrossSectionSurvey, SurveyError> {
    let file = surveys::csv_file_name(transect.id);
    let path = dir.join(&file);
    let content = std::fs::read_to_string(&path).map_err(|e| SurveyError::Io {
        file: file.clone(),
        message: e.to_string(),
    })?;
    let points = parse_transect_csv(&file, &content)?;
    Ok(CrossSectionSurvey {
        id: transect.id.to_string(),
        lithology: transect.lithology,
        points,
        left_reference_index: transect.left_reference_index,
    })
}

/// Loads the whole registered corpus from `dir`.
///
/// A transect that fails to load is skipped and reported by identifier;
/// it must never be treated as a zero-valued case in aggregate statistics.
pub fn load_corpus(dir: &Path) -> (Vec<CrossSectionSurvey>, Vec<(String, SurveyError)>) {
    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for transect in surveys::TRANSECT_REGISTRY {
        match load_transect(dir, transect) {
            Ok(survey) => loaded.push(survey),
            Err(err) => {
                crate::logging::log_skipped_input(
                    crate::logging::Dataset::Transects,
                    transect.id,
                    &err,
                );
                failed.push((transect.id.to_string(), err));
            }
        }
    }
    crate::logging::log_corpus_summary(
        crate::logging::Dataset::Transects,
        surveys::TRANSECT_REGISTRY.len(),
        loaded.len(),
        failed.len(),
    );
    (loaded, failed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
