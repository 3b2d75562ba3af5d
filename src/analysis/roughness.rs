//! Channel-bed roughness via inflection counting.
//!
//! Each transect is densified to a fine grid, then resampled at a ladder
//! of sampling intervals; at every interval the number of slope reversals
//! is counted. Dividing by surveyed transect length turns the count into
//! an inflection frequency comparable across transects of different
//! widths. Coarser sampling smooths the profile, so frequency falls off
//! with interval — how fast it falls distinguishes rough carbonate beds
//! from planar sandstone ones.

use serde::Serialize;

use crate::analysis::SkippedSurvey;
use crate::logging;
use crate::model::{CrossSectionSurvey, Lithology, SurveyError};
use crate::resample::{count_inflections, densify, resample};

/// Densify step used before resampling, in meters.
pub const DEFAULT_DX: f64 = 0.1;

/// The sampling-interval ladder (m): every 0.1 m up to 1 m, then every
/// 0.5 m out to 10 m.
pub const DEFAULT_SPACINGS: [f64; 28] = [
    0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0,
    5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0,
];

/// Inflection counts and frequencies for every (interval, transect) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflectionTable {
    pub spacings: Vec<f64>,
    pub survey_ids: Vec<String>,
    pub lithologies: Vec<Lithology>,
    /// `counts[i][j]`: inflection count at `spacings[i]` for `survey_ids[j]`.
    pub counts: Vec<Vec<usize>>,
    /// Counts normalized by surveyed transect length, per meter.
    pub frequencies: Vec<Vec<f64>>,
}

/// Per-lithology means across the group's transects, one value per
/// sampling interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub lithology: Lithology,
    pub mean_counts: Vec<f64>,
    pub mean_frequencies: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoughnessAnalysis {
    pub dx: f64,
    pub table: InflectionTable,
    pub group_means: Vec<GroupMeans>,
    pub skipped: Vec<SkippedSurvey>,
}

/// Runs the roughness analysis over the loaded corpus.
///
/// A transect that cannot be densified (or has no usable length) is
/// skipped and reported, never counted as zero roughness.
pub fn analyze(
    surveys: &[CrossSectionSurvey],
    spacings: &[f64],
    dx: f64,
) -> Result<RoughnessAnalysis, SurveyError> {
    if spacings.is_empty() {
        return Err(SurveyError::InvalidParameter(
            "sampling interval ladder is empty".to_string(),
        ));
    }
    if !(dx > 0.0) || !dx.is_finite() {
        return Err(SurveyError::InvalidParameter(format!(
            "densify step dx must be positive and finite, got {}",
            dx
        )));
    }

    let mut survey_ids = Vec::new();
    let mut lithologies = Vec::new();
    let mut skipped = Vec::new();
    // Densify once per transect; each ladder step only re-thins the grid.
    let mut profiles = Vec::new();
    let mut lengths = Vec::new();

    for survey in surveys {
        let profile = match densify(survey, dx) {
            Ok(p) => p,
            Err(err) => {
                logging::log_skipped_input(logging::Dataset::Transects, &survey.id, &err);
                skipped.push(SkippedSurvey { id: survey.id.clone(), reason: err.to_string() });
                continue;
            }
        };
        let length = match survey.surveyed_length() {
            Some(l) if l > 0.0 => l,
            _ => {
                let err = SurveyError::InvalidSurvey(format!(
                    "{}: surveyed length is not positive",
                    survey.id
                ));
                logging::log_skipped_input(logging::Dataset::Transects, &survey.id, &err);
                skipped.push(SkippedSurvey { id: survey.id.clone(), reason: err.to_string() });
                continue;
            }
        };
        survey_ids.push(survey.id.clone());
        lithologies.push(survey.lithology);
        profiles.push(profile);
        lengths.push(length);
    }

    let mut counts = Vec::with_capacity(spacings.len());
    let mut frequencies = Vec::with_capacity(spacings.len());
    for &spacing in spacings {
        let mut count_row = Vec::with_capacity(profiles.len());
        let mut freq_row = Vec::with_capacity(profiles.len());
        for (profile, &length) in profiles.iter().zip(&lengths) {
            let thinned = resample(profile, spacing)?;
            let count = count_inflections(&thinned.z);
            count_row.push(count);
            freq_row.push(count as f64 / length);
        }
        counts.push(count_row);
        frequencies.push(freq_row);
    }

    let table = InflectionTable {
        spacings: spacings.to_vec(),
        survey_ids,
        lithologies,
        counts,
        frequencies,
    };
    let group_means = group_means(&table);

    Ok(RoughnessAnalysis { dx, table, group_means, skipped })
}

fn group_means(table: &InflectionTable) -> Vec<GroupMeans> {
    Lithology::ALL
        .iter()
        .map(|&lithology| {
            let columns: Vec<usize> = table
                .lithologies
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == lithology)
                .map(|(j, _)| j)
                .collect();
            let mean_over = |rows: &[Vec<f64>]| -> Vec<f64> {
                rows.iter()
                    .map(|row| {
                        if columns.is_empty() {
                            f64::NAN
                        } else {
                            columns.iter().map(|&j| row[j]).sum::<f64>() / columns.len() as f64
                        }
                    })
                    .collect()
            };
            let count_rows: Vec<Vec<f64>> = table
                .counts
                .iter()
                .map(|row| row.iter().map(|&c| c as f64).collect())
                .collect();
            GroupMeans {
                lithology,
                mean_counts: mean_over(&count_rows),
                mean_frequencies: mean_over(&table.frequencies),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
