//! Run reports.
//!
//! Each batch run emits one JSON document per analysis plus a run summary,
//! so downstream plotting and review tooling never has to re-run the
//! numerics. Analyses that failed are recorded with their error text
//! rather than omitted — an absent result and a failed result are
//! different findings.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::analysis::hypsometry::HypsometryAnalysis;
use crate::analysis::orientation::RoseDiagram;
use crate::analysis::roughness::RoughnessAnalysis;
use crate::analysis::spacing::SpacingAnalysis;
use crate::analysis::strength::StrengthAnalysis;
use crate::model::SurveyError;

// ---------------------------------------------------------------------------
// Report structure
// ---------------------------------------------------------------------------

/// Outcome of one analysis: its result payload, or why it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    Ok { result: T },
    Failed { error: String },
}

impl<T> AnalysisOutcome<T> {
    pub fn from_result(result: Result<T, SurveyError>) -> AnalysisOutcome<T> {
        match result {
            Ok(result) => AnalysisOutcome::Ok { result },
            Err(err) => AnalysisOutcome::Failed { error: err.to_string() },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AnalysisOutcome::Ok { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub analyses_run: usize,
    pub analyses_failed: usize,
    pub transects_loaded: usize,
    pub transects_skipped: usize,
    /// Identifiers of transects that failed to load, with reasons.
    pub load_failures: Vec<LoadFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub id: String,
    pub error: String,
}

/// The complete output of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// UTC timestamp of report generation, RFC 3339.
    pub generated_utc: String,
    pub summary: RunSummary,
    pub roughness: AnalysisOutcome<RoughnessAnalysis>,
    pub hypsometry: AnalysisOutcome<HypsometryAnalysis>,
    pub spacing: AnalysisOutcome<SpacingAnalysis>,
    pub orientation: AnalysisOutcome<Vec<RoseDiagram>>,
    pub strength: AnalysisOutcome<StrengthAnalysis>,
}

impl RunReport {
    pub fn new(
        load_failures: Vec<(String, SurveyError)>,
        transects_loaded: usize,
        roughness: Result<RoughnessAnalysis, SurveyError>,
        hypsometry: Result<HypsometryAnalysis, SurveyError>,
        spacing: Result<SpacingAnalysis, SurveyError>,
        orientation: Result<Vec<RoseDiagram>, SurveyError>,
        strength: Result<StrengthAnalysis, SurveyError>,
    ) -> RunReport {
        let roughness = AnalysisOutcome::from_result(roughness);
        let hypsometry = AnalysisOutcome::from_result(hypsometry);
        let spacing = AnalysisOutcome::from_result(spacing);
        let orientation = AnalysisOutcome::from_result(orientation);
        let strength = AnalysisOutcome::from_result(strength);

        let outcomes = [
            roughness.is_ok(),
            hypsometry.is_ok(),
            spacing.is_ok(),
            orientation.is_ok(),
            strength.is_ok(),
        ];
        let summary = RunSummary {
            analyses_run: outcomes.len(),
            analyses_failed: outcomes.iter().filter(|ok| !**ok).count(),
            transects_loaded,
            transects_skipped: load_failures.len(),
            load_failures: load_failures
                .into_iter()
                .map(|(id, err)| LoadFailure { id, error: err.to_string() })
                .collect(),
        };

        RunReport {
            generated_utc: Utc::now().to_rfc3339(),
            summary,
            roughness,
            hypsometry,
            spacing,
            orientation,
            strength,
        }
    }

    /// True if every analysis failed; the batch driver exits nonzero then.
    pub fn all_failed(&self) -> bool {
        self.summary.analyses_failed == self.summary.analyses_run
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Writes the report as pretty-printed JSON under `output_dir`.
/// Returns the path written.
pub fn write_report(output_dir: &Path, report: &RunReport) -> Result<std::path::PathBuf, SurveyError> {
    std::fs::create_dir_all(output_dir).map_err(|e| SurveyError::Io {
        file: output_dir.display().to_string(),
        message: e.to_string(),
    })?;
    let path = output_dir.join("survey_analysis_report.json");
    let json = serde_json::to_string_pretty(report).map_err(|e| SurveyError::Io {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, json).map_err(|e| SurveyError::Io {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
