//! Supplementary measurement tables.
//!
//! Four spreadsheet exports ride along with the transect corpus, each with
//! its own quirks preserved from the field workbooks:
//!
//! - `bedding_thickness.csv` — per-unit bed thickness (cm); columns are
//!   ragged, so trailing blank cells are dropped per column.
//! - `fracture_spacing.csv` — fracture spacing measured in meters and
//!   reported in centimeters; the carbonate column carries a transect
//!   indicator (1 = thalweg set, 2 = bank set).
//! - `fracture_orientations.csv` — fracture bearings with an assemblage id
//!   (1 = carbonate thalweg, 2 = carbonate bank, 3 = fine sandstone,
//!   4 = coarse sandstone).
//! - `strength_data.csv` — point-load index by lithology code; spreadsheet
//!   error cells (`#VALUE!`) are dropped and counted.

use std::path::Path;

use crate::ingest::{column_index, parse_cell};
use crate::model::{Assemblage, SurveyError};

/// Meters to centimeters, applied to fracture spacing measurements.
const M_TO_CM: f64 = 100.0;

// ---------------------------------------------------------------------------
// Bed thickness
// ---------------------------------------------------------------------------

/// Bed thickness samples (cm) per lithology, ragged lengths allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct BedThicknessTable {
    pub fine: Vec<f64>,
    pub coarse: Vec<f64>,
    pub carbonate: Vec<f64>,
}

pub fn parse_bed_thickness(file: &str, content: &str) -> Result<BedThicknessTable, SurveyError> {
    let columns = ragged_columns(file, content, &["Fine", "Coarse", "Carb"])?;
    let [fine, coarse, carbonate] = columns;
    if fine.is_empty() && coarse.is_empty() && carbonate.is_empty() {
        return Err(SurveyError::InvalidSurvey(format!("{}: no data rows", file)));
    }
    Ok(BedThicknessTable { fine, coarse, carbonate })
}

pub fn load_bed_thickness(path: &Path) -> Result<BedThicknessTable, SurveyError> {
    let (file, content) = read(path)?;
    parse_bed_thickness(&file, &content)
}

// ---------------------------------------------------------------------------
// Fracture spacing
// ---------------------------------------------------------------------------

/// Fracture spacing samples, converted to centimeters. The carbonate
/// measurements split into the thalweg-parallel and bank-parallel sets
/// according to the transect indicator recorded with each value.
#[derive(Debug, Clone, PartialEq)]
pub struct FractureSpacingTable {
    pub fine_cm: Vec<f64>,
    pub coarse_cm: Vec<f64>,
    pub carbonate_thalweg_cm: Vec<f64>,
    pub carbonate_bank_cm: Vec<f64>,
    /// Carbonate rows whose indicator was neither 1 (thalweg) nor 2 (bank).
    pub unclassified_carbonate: usize,
}

impl FractureSpacingTable {
    /// All carbonate samples regardless of transect set.
    pub fn carbonate_all_cm(&self) -> Vec<f64> {
        let mut all = self.carbonate_thalweg_cm.clone();
        all.extend_from_slice(&self.carbonate_bank_cm);
        all
    }
}

pub fn parse_fracture_spacing(
    file: &str,
    content: &str,
) -> Result<FractureSpacingTable, SurveyError> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| SurveyError::InvalidSurvey(format!("{}: empty file", file)))?;
    let fine_col = column_index(header, "Fine", file)?;
    let coarse_col = column_index(header, "Coarse", file)?;
    let carb_col = column_index(header, "Carb", file)?;
    let set_col = column_index(header, "Carb-transect", file)?;

    let mut table = FractureSpacingTable {
        fine_cm: Vec::new(),
        coarse_cm: Vec::new(),
        carbonate_thalweg_cm: Vec::new(),
        carbonate_bank_cm: Vec::new(),
        unclassified_carbonate: 0,
    };

    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        for (col, out) in [(fine_col, &mut table.fine_cm), (coarse_col, &mut table.coarse_cm)] {
            match cells.get(col).and_then(|c| parse_cell(c)) {
                Some(Ok(v)) => out.push(v * M_TO_CM),
                Some(Err(())) => {
                    return Err(parse_error(file, line_num, "unreadable spacing value"));
                }
                None => {}
            }
        }
        match cells.get(carb_col).and_then(|c| parse_cell(c)) {
            Some(Ok(v)) => {
                let spacing_cm = v * M_TO_CM;
                match cells.get(set_col).and_then(|c| parse_cell(c)) {
                    Some(Ok(set)) if set == 1.0 => table.carbonate_thalweg_cm.push(spacing_cm),
                    Some(Ok(set)) if set == 2.0 => table.carbonate_bank_cm.push(spacing_cm),
                    _ => table.unclassified_carbonate += 1,
                }
            }
            Some(Err(())) => return Err(parse_error(file, line_num, "unreadable spacing value")),
            None => {}
        }
    }

    Ok(table)
}

pub fn load_fracture_spacing(path: &Path) -> Result<FractureSpacingTable, SurveyError> {
    let (file, content) = read(path)?;
    parse_fracture_spacing(&file, &content)
}

// ---------------------------------------------------------------------------
// Fracture orientations
// ---------------------------------------------------------------------------

/// One fracture bearing measurement assigned to an assemblage.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationRecord {
    pub bearing_deg: f64,
    pub assemblage: Assemblage,
}

pub fn parse_orientations(
    file: &str,
    content: &str,
) -> Result<Vec<OrientationRecord>, SurveyError> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| SurveyError::InvalidSurvey(format!("{}: empty file", file)))?;
    let bearing_col = column_index(header, "Bearing", file)?;
    let assemblage_col = column_index(header, "AssemblageID", file)?;

    let mut records = Vec::new();
    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        let bearing = cells.get(bearing_col).and_then(|c| parse_cell(c));
        let id = cells.get(assemblage_col).and_then(|c| parse_cell(c));
        match (bearing, id) {
            (Some(Ok(bearing_deg)), Some(Ok(id))) => {
                let assemblage = Assemblage::from_id(id).ok_or_else(|| {
                    parse_error(file, line_num, "assemblage id outside 1..=4")
                })?;
                records.push(OrientationRecord { bearing_deg, assemblage });
            }
            // Trailing workbook rows: both cells blank.
            (None, None) => continue,
            _ => return Err(parse_error(file, line_num, "half-recorded orientation row")),
        }
    }
    if records.is_empty() {
        return Err(SurveyError::InvalidSurvey(format!("{}: no data rows", file)));
    }
    Ok(records)
}

pub fn load_orientations(path: &Path) -> Result<Vec<OrientationRecord>, SurveyError> {
    let (file, content) = read(path)?;
    parse_orientations(&file, &content)
}

// ---------------------------------------------------------------------------
// Rock strength
// ---------------------------------------------------------------------------

/// One point-load break result.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthMeasurement {
    /// Field lithology code: C1..C4 for carbonate facies, SS1 (fine) or
    /// SS2 (coarse) for the sandstones.
    pub lithology_code: String,
    pub is50_mpa: f64,
}

/// All usable strength measurements, plus the count of spreadsheet error
/// cells that were dropped on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthTable {
    pub measurements: Vec<StrengthMeasurement>,
    pub dropped_cells: usize,
}

pub fn parse_strength(file: &str, content: &str) -> Result<StrengthTable, SurveyError> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| SurveyError::InvalidSurvey(format!("{}: empty file", file)))?;
    let code_col = column_index(header, "Lithology", file)?;
    let is50_col = column_index(header, "Is50MPa", file)?;

    let mut measurements = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        let code = cells.get(code_col).map(|c| c.trim()).unwrap_or("");
        if code.is_empty() {
            continue;
        }
        match cells.get(is50_col).and_then(|c| parse_cell(c)) {
            Some(Ok(is50_mpa)) => measurements.push(StrengthMeasurement {
                lithology_code: code.to_string(),
                is50_mpa,
            }),
            // The workbook computes Is50 from raw gauge readings; a bad
            // gauge row exports as "#VALUE!". Drop it, keep the count.
            Some(Err(())) | None => dropped += 1,
        }
    }
    if measurements.is_empty() {
        return Err(SurveyError::InvalidSurvey(format!("{}: no usable rows", file)));
    }
    Ok(StrengthTable { measurements, dropped_cells: dropped })
}

pub fn load_strength(path: &Path) -> Result<StrengthTable, SurveyError> {
    let (file, content) = read(path)?;
    parse_strength(&file, &content)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn read(path: &Path) -> Result<(String, String), SurveyError> {
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content = std::fs::read_to_string(path).map_err(|e| SurveyError::Io {
        file: file.clone(),
        message: e.to_string(),
    })?;
    Ok((file, content))
}

fn parse_error(file: &str, line_num: usize, message: &str) -> SurveyError {
    SurveyError::Parse {
        file: file.to_string(),
        line: line_num + 2,
        message: message.to_string(),
    }
}

/// Collects the named columns independently, skipping blank cells, so
/// ragged workbook columns come out at their true lengths.
fn ragged_columns<const N: usize>(
    file: &str,
    content: &str,
    names: &[&str; N],
) -> Result<[Vec<f64>; N], SurveyError> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| SurveyError::InvalidSurvey(format!("{}: empty file", file)))?;
    let mut indices = [0usize; N];
    for (i, name) in names.iter().enumerate() {
        indices[i] = column_index(header, name, file)?;
    }

    let mut columns: [Vec<f64>; N] = std::array::from_fn(|_| Vec::new());
    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        for (i, &col) in indices.iter().enumerate() {
            match cells.get(col).and_then(|c| parse_cell(c)) {
                Some(Ok(v)) => columns[i].push(v),
                Some(Err(())) => {
                    return Err(parse_error(file, line_num, "unreadable numeric cell"));
                }
                None => {}
            }
        }
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
