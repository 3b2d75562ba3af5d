//! Rock strength (point-load index) summaries and comparisons.
//!
//! The point-load campaign codes each break by facies: C1..C4 within the
//! carbonate, SS2 for the coarse sandstone, SS1 for the fine. Per-code
//! quartile summaries feed the violin rendering downstream; the tests run
//! at both resolutions (six facies codes, and the lumped carbonate /
//! coarse / fine grouping) plus the pooled two-unit comparison.

use serde::Serialize;

use crate::analysis::descriptive::{quartile_summary, QuartileSummary};
use crate::analysis::nonparametric::{
    dunn_bonferroni, kruskal_wallis, mann_whitney_u, DunnComparison, KruskalWallisResult,
    MannWhitneyResult,
};
use crate::ingest::tables::StrengthTable;
use crate::model::SurveyError;

/// Carbonate facies codes, in the order they are summarized and tested.
pub const CARBONATE_CODES: [&str; 4] = ["C1", "C2", "C3", "C4"];
/// Coarse sandstone facies code.
pub const COARSE_CODE: &str = "SS2";
/// Fine sandstone facies code.
pub const FINE_CODE: &str = "SS1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeSummary {
    pub code: String,
    pub summary: QuartileSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthAnalysis {
    /// C1..C4, then coarse (SS2), then fine (SS1).
    pub per_code: Vec<CodeSummary>,
    pub pooled_carbonate: QuartileSummary,
    pub pooled_sandstone: QuartileSummary,
    /// Dropped spreadsheet error cells, carried through from ingestion.
    pub dropped_cells: usize,
    /// Codes present in the table but not recognized by this analysis.
    pub unknown_codes: Vec<String>,

    /// Across the six facies codes.
    pub kruskal: KruskalWallisResult,
    pub dunn: Vec<DunnComparison>,
    /// Over (pooled carbonate, coarse, fine).
    pub dunn_lumped_carbonate: Vec<DunnComparison>,
    /// Pooled carbonate vs. pooled sandstone.
    pub carbonate_vs_sandstone: MannWhitneyResult,
}

fn values_for(table: &StrengthTable, code: &str) -> Vec<f64> {
    table
        .measurements
        .iter()
        .filter(|m| m.lithology_code == code)
        .map(|m| m.is50_mpa)
        .collect()
}

/// Runs the rock strength analysis.
pub fn analyze(table: &StrengthTable) -> Result<StrengthAnalysis, SurveyError> {
    let mut splits: Vec<(String, Vec<f64>)> = CARBONATE_CODES
        .iter()
        .map(|&code| (code.to_string(), values_for(table, code)))
        .collect();
    splits.push((COARSE_CODE.to_string(), values_for(table, COARSE_CODE)));
    splits.push((FINE_CODE.to_string(), values_for(table, FINE_CODE)));

    let mut per_code = Vec::with_capacity(splits.len());
    for (code, values) in &splits {
        let summary = quartile_summary(values).ok_or_else(|| {
            SurveyError::InvalidSurvey(format!("no usable breaks for facies code {}", code))
        })?;
        per_code.push(CodeSummary { code: code.clone(), summary });
    }

    let carbonate: Vec<f64> = splits[..4].iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let coarse = &splits[4].1;
    let fine = &splits[5].1;
    let mut sandstone = coarse.clone();
    sandstone.extend_from_slice(fine);

    let pooled_carbonate = quartile_summary(&carbonate).ok_or_else(|| {
        SurveyError::InvalidSurvey("no carbonate breaks".to_string())
    })?;
    let pooled_sandstone = quartile_summary(&sandstone).ok_or_else(|| {
        SurveyError::InvalidSurvey("no sandstone breaks".to_string())
    })?;

    let known: std::collections::HashSet<&str> = CARBONATE_CODES
        .iter()
        .copied()
        .chain([COARSE_CODE, FINE_CODE])
        .collect();
    let mut unknown_codes: Vec<String> = table
        .measurements
        .iter()
        .map(|m| m.lithology_code.as_str())
        .filter(|c| !known.contains(c))
        .map(String::from)
        .collect();
    unknown_codes.sort();
    unknown_codes.dedup();

    let six_way: Vec<&[f64]> = splits.iter().map(|(_, v)| v.as_slice()).collect();
    let kruskal = kruskal_wallis(&six_way)?;
    let dunn = dunn_bonferroni(&six_way)?;
    let dunn_lumped_carbonate =
        dunn_bonferroni(&[&carbonate, coarse.as_slice(), fine.as_slice()])?;
    let carbonate_vs_sandstone = mann_whitney_u(&carbonate, &sandstone)?;

    Ok(StrengthAnalysis {
        per_code,
        pooled_carbonate,
        pooled_sandstone,
        dropped_cells: table.dropped_cells,
        unknown_codes,
        kruskal,
        dunn,
        dunn_lumped_carbonate,
        carbonate_vs_sandstone,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
