//! Core data types for the Dry Fork field-survey analyses.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic, no I/O, and no external dependencies — only types.

use std::fmt;

// ---------------------------------------------------------------------------
// Lithology classes
// ---------------------------------------------------------------------------

/// Rock unit a surveyed transect or measurement belongs to.
///
/// The study reaches partition into three mapped units: the carbonate,
/// the coarse sandstone, and the fine sandstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Lithology {
    Carbonate,
    CoarseSandstone,
    FineSandstone,
}

impl Lithology {
    /// All classes, in the canonical corpus order (carbonate, coarse, fine).
    pub const ALL: [Lithology; 3] = [
        Lithology::Carbonate,
        Lithology::CoarseSandstone,
        Lithology::FineSandstone,
    ];

    /// Short label used in reports and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Lithology::Carbonate => "carbonate",
            Lithology::CoarseSandstone => "coarse_sandstone",
            Lithology::FineSandstone => "fine_sandstone",
        }
    }
}

impl fmt::Display for Lithology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Fracture assemblages
// ---------------------------------------------------------------------------

/// Fracture assemblage a bearing measurement belongs to. The carbonate
/// fractures split into a thalweg-parallel and a bank-parallel set; the
/// sandstone units each carry one assemblage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Assemblage {
    CarbonateThalweg,
    CarbonateBank,
    FineSandstone,
    CoarseSandstone,
}

impl Assemblage {
    /// All assemblages, in workbook id order (1..=4).
    pub const ALL: [Assemblage; 4] = [
        Assemblage::CarbonateThalweg,
        Assemblage::CarbonateBank,
        Assemblage::FineSandstone,
        Assemblage::CoarseSandstone,
    ];

    /// Maps the workbook `AssemblageID` column (1.0..=4.0) to a class.
    pub fn from_id(id: f64) -> Option<Assemblage> {
        match id as i64 {
            1 if id == 1.0 => Some(Assemblage::CarbonateThalweg),
            2 if id == 2.0 => Some(Assemblage::CarbonateBank),
            3 if id == 3.0 => Some(Assemblage::FineSandstone),
            4 if id == 4.0 => Some(Assemblage::CoarseSandstone),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Assemblage::CarbonateThalweg => "carbonate_thalweg",
            Assemblage::CarbonateBank => "carbonate_bank",
            Assemblage::FineSandstone => "fine_sandstone",
            Assemblage::CoarseSandstone => "coarse_sandstone",
        }
    }
}

impl fmt::Display for Assemblage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Survey types
// ---------------------------------------------------------------------------

/// One surveyed point on a channel cross-section transect.
///
/// `position` is along-transect distance in meters; `elevation` is meters
/// above the thalweg (the survey crew normalizes to thalweg = 0 before the
/// data reaches this crate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyPoint {
    pub position: f64,
    pub elevation: f64,
}

/// One physically surveyed channel cross-section.
///
/// Points are stored in file order and are not necessarily sorted or unique
/// by position; `resample::densify` sorts a working copy and never mutates
/// the survey in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionSurvey {
    /// Identifier, e.g. "DFC_3" (the source file stem).
    pub id: String,
    pub lithology: Lithology,
    pub points: Vec<SurveyPoint>,
    /// Index of the sample used as the left bank reference when trimming
    /// to uniform banks. 0 for every transect except DFSSF_1, whose first
    /// surveyed point is an outlier off the true bank.
    pub left_reference_index: usize,
}

impl CrossSectionSurvey {
    /// Total surveyed length: the largest along-transect position.
    /// Used to normalize inflection counts into frequencies.
    pub fn surveyed_length(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.position)
            .fold(None, |acc, x| match acc {
                Some(m) if m >= x => Some(m),
                _ => Some(x),
            })
    }
}

// ---------------------------------------------------------------------------
// Derived profile types
// ---------------------------------------------------------------------------

/// A cross-section densified onto a uniform position grid.
///
/// Invariants (upheld by `resample::densify`, which is the only producer):
/// `x.len() == z.len()`, `x` strictly increasing with constant step `dx`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensifiedProfile {
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    pub dx: f64,
}

/// A densified profile thinned to a coarser sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledProfile {
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    pub sample_spacing: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading or processing survey data.
///
/// All variants are fatal to the single survey or table being processed;
/// batch drivers skip the failed input and report its identifier so that
/// aggregate statistics are never silently padded with missing cases.
#[derive(Debug, PartialEq)]
pub enum SurveyError {
    /// Malformed or too-short survey (fewer than 2 points).
    InvalidSurvey(String),
    /// Non-positive or non-finite step / spacing parameter.
    InvalidParameter(String),
    /// A required column header was not found in the table.
    MissingColumn { file: String, column: String },
    /// A cell could not be parsed as a number.
    Parse { file: String, line: usize, message: String },
    /// The file could not be read.
    Io { file: String, message: String },
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::InvalidSurvey(msg) => write!(f, "invalid survey: {}", msg),
            SurveyError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            SurveyError::MissingColumn { file, column } => {
                write!(f, "{}: missing required column '{}'", file, column)
            }
            SurveyError::Parse { file, line, message } => {
                write!(f, "{}:{}: {}", file, line, message)
            }
            SurveyError::Io { file, message } => write!(f, "{}: {}", file, message),
        }
    }
}

impl std::error::Error for SurveyError {}
