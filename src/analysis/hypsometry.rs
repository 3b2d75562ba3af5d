//! Cross-section hypsometry: elevation distributions above the thalweg.
//!
//! Every transect is densified to a fine grid and resampled at a common
//! interval so each surveyed meter of channel boundary contributes the
//! same weight. Raw pools feed the group tests; bank-trimmed pools (only
//! elevations below the lower of the two surveyed banks) remove the bias
//! from whichever bank happened to be surveyed further up, and feed the
//! histograms and the carbonate-versus-sandstone comparison.

use serde::Serialize;

use crate::analysis::nonparametric::{
    dunn_bonferroni, kruskal_wallis, mann_whitney_u, DunnComparison, KruskalWallisResult,
    MannWhitneyResult,
};
use crate::analysis::{groupings, SkippedSurvey};
use crate::logging;
use crate::model::{CrossSectionSurvey, Lithology, SurveyError};
use crate::resample::{densify, resample, trim_to_uniform_banks};

/// Densify step (m). Finer than the roughness analysis: the histograms
/// resolve 0.1 m elevation bins, so interpolation error must sit well
/// below that.
pub const DEFAULT_DX: f64 = 0.01;

/// Common resampling interval (m) for pooling elevations.
pub const DEFAULT_SAMPLE_SPACING: f64 = 0.1;

/// Elevation histogram domain and bin width (m), matching the published
/// 0–4 m by 0.1 m convention.
pub const DEFAULT_HIST_MIN: f64 = 0.0;
pub const DEFAULT_HIST_MAX: f64 = 4.0;
pub const DEFAULT_BIN_WIDTH: f64 = 0.1;

/// Pooled elevation samples for one lithology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LithologyPool {
    pub lithology: Lithology,
    /// Every resampled elevation from every transect in the group.
    pub raw: Vec<f64>,
    /// As `raw`, but trimmed to the lower of each transect's two banks.
    pub bank_trimmed: Vec<f64>,
}

/// Fixed-width elevation histogram with probability-density scaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationHistogram {
    pub bin_width: f64,
    /// Bin centers, lowest to highest.
    pub centers: Vec<f64>,
    pub counts: Vec<usize>,
    /// `counts / (total_in_domain * bin_width)`; integrates to 1.
    pub densities: Vec<f64>,
    /// Samples outside the histogram domain (excluded from `counts`).
    pub out_of_domain: usize,
}

/// Builds a histogram over `[min, max)` with uniform `bin_width`.
pub fn elevation_histogram(
    values: &[f64],
    min: f64,
    max: f64,
    bin_width: f64,
) -> Result<ElevationHistogram, SurveyError> {
    if !(bin_width > 0.0) || !bin_width.is_finite() {
        return Err(SurveyError::InvalidParameter(format!(
            "histogram bin width must be positive, got {}",
            bin_width
        )));
    }
    if !(max > min) {
        return Err(SurveyError::InvalidParameter(format!(
            "histogram domain [{}, {}) is empty",
            min, max
        )));
    }

    let bins = ((max - min) / bin_width).ceil() as usize;
    let mut counts = vec![0usize; bins];
    let mut out_of_domain = 0usize;
    for &v in values {
        let t = (v - min) / bin_width;
        if !t.is_finite() || t < 0.0 {
            out_of_domain += 1;
            continue;
        }
        let idx = t.floor() as usize;
        if idx >= bins {
            out_of_domain += 1;
            continue;
        }
        counts[idx] += 1;
    }

    let total: usize = counts.iter().sum();
    let densities = counts
        .iter()
        .map(|&c| {
            if total == 0 {
                0.0
            } else {
                c as f64 / (total as f64 * bin_width)
            }
        })
        .collect();
    let centers = (0..bins).map(|b| min + (b as f64 + 0.5) * bin_width).collect();

    Ok(ElevationHistogram { bin_width, centers, counts, densities, out_of_domain })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupHistogram {
    pub lithology: Lithology,
    pub histogram: ElevationHistogram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypsometryAnalysis {
    pub dx: f64,
    pub sample_spacing: f64,
    pub pools: Vec<LithologyPool>,
    /// Bank-trimmed density histogram per lithology.
    pub histograms: Vec<GroupHistogram>,
    /// Kruskal–Wallis across the three raw pools.
    pub kruskal: KruskalWallisResult,
    /// Dunn post-hoc over the raw pools (carbonate, coarse, fine order).
    pub dunn: Vec<DunnComparison>,
    /// Mann–Whitney U, carbonate vs. pooled sandstone, on trimmed pools.
    pub carbonate_vs_sandstone: MannWhitneyResult,
    pub skipped: Vec<SkippedSurvey>,
}

/// Runs the hypsometry analysis over the loaded corpus.
pub fn analyze(
    surveys: &[CrossSectionSurvey],
    dx: f64,
    sample_spacing: f64,
    hist_min: f64,
    hist_max: f64,
    bin_width: f64,
) -> Result<HypsometryAnalysis, SurveyError> {
    let mut skipped = Vec::new();
    let mut pools = Vec::new();

    for group in groupings::group_by_lithology(surveys) {
        let mut raw = Vec::new();
        let mut bank_trimmed = Vec::new();
        for survey in &group.surveys {
            let sampled = match densify(survey, dx).and_then(|p| resample(&p, sample_spacing)) {
                Ok(r) => r,
                Err(err) => {
                    logging::log_skipped_input(logging::Dataset::Transects, &survey.id, &err);
                    skipped.push(SkippedSurvey {
                        id: survey.id.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            raw.extend_from_slice(&sampled.z);
            bank_trimmed.extend(trim_to_uniform_banks(&sampled.z, survey.left_reference_index));
        }
        pools.push(LithologyPool { lithology: group.lithology, raw, bank_trimmed });
    }

    let histograms = pools
        .iter()
        .map(|pool| {
            Ok(GroupHistogram {
                lithology: pool.lithology,
                histogram: elevation_histogram(&pool.bank_trimmed, hist_min, hist_max, bin_width)?,
            })
        })
        .collect::<Result<Vec<_>, SurveyError>>()?;

    let raw_groups: Vec<&[f64]> = pools.iter().map(|p| p.raw.as_slice()).collect();
    let kruskal = kruskal_wallis(&raw_groups)?;
    let dunn = dunn_bonferroni(&raw_groups)?;

    // Pools are in canonical order: carbonate, coarse, fine.
    let carbonate = pools[0].bank_trimmed.as_slice();
    let mut sandstone = pools[1].bank_trimmed.clone();
    sandstone.extend_from_slice(&pools[2].bank_trimmed);
    let carbonate_vs_sandstone = mann_whitney_u(carbonate, &sandstone)?;

    Ok(HypsometryAnalysis {
        dx,
        sample_spacing,
        pools,
        histograms,
        kruskal,
        dunn,
        carbonate_vs_sandstone,
        skipped,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
