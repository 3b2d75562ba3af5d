//! Rank-based group comparison tests.
//!
//! The field samples are small, skewed, and censored at detection limits,
//! so every group comparison in this crate is nonparametric: Kruskal–Wallis
//! across groups, Dunn's post-hoc with Bonferroni adjustment for pairwise
//! follow-up, and Mann–Whitney U for the two-group pooled comparisons.
//!
//! P-values are two-sided asymptotic approximations with midrank tie
//! corrections throughout (and a continuity correction for Mann–Whitney).
//! Distribution CDFs come from `statrs`.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::model::SurveyError;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KruskalWallisResult {
    /// Tie-corrected H statistic.
    pub h: f64,
    /// Degrees of freedom (group count − 1).
    pub df: usize,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample.
    pub u: f64,
    /// Standardized statistic after tie and continuity corrections.
    pub z: f64,
    pub p_value: f64,
}

/// One pairwise Dunn comparison, indices into the caller's group order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DunnComparison {
    pub group_a: usize,
    pub group_b: usize,
    pub z: f64,
    /// Two-sided p-value after Bonferroni adjustment over all pairs.
    pub p_adjusted: f64,
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Midranks of `values` (ties share the average of their rank range,
/// 1-based). Also returns `Σ(t³ − t)` over tie groups, the quantity every
/// tie correction below needs.
fn midranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut tie_sum = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let shared = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = shared;
        }
        let t = (j - i + 1) as f64;
        tie_sum += t * t * t - t;
        i = j + 1;
    }
    (ranks, tie_sum)
}

fn validate_groups(groups: &[&[f64]], min_groups: usize) -> Result<(), SurveyError> {
    if groups.len() < min_groups {
        return Err(SurveyError::InvalidParameter(format!(
            "need at least {} groups, got {}",
            min_groups,
            groups.len()
        )));
    }
    for (i, g) in groups.iter().enumerate() {
        if g.is_empty() {
            return Err(SurveyError::InvalidParameter(format!(
                "group {} is empty",
                i
            )));
        }
        if !g.iter().all(|x| x.is_finite()) {
            return Err(SurveyError::InvalidParameter(format!(
                "group {} contains a non-finite value",
                i
            )));
        }
    }
    Ok(())
}

fn normal_sf(z: f64) -> Result<f64, SurveyError> {
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| SurveyError::InvalidParameter(e.to_string()))?;
    Ok(1.0 - standard.cdf(z))
}

// ---------------------------------------------------------------------------
// Kruskal–Wallis
// ---------------------------------------------------------------------------

/// Kruskal–Wallis H test across two or more groups.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Result<KruskalWallisResult, SurveyError> {
    validate_groups(groups, 2)?;

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    if pooled.len() <= groups.len() {
        return Err(SurveyError::InvalidParameter(
            "too few observations for a rank test".to_string(),
        ));
    }
    let (ranks, tie_sum) = midranks(&pooled);

    let mut h = 0.0;
    let mut offset = 0;
    for g in groups {
        let rank_sum: f64 = ranks[offset..offset + g.len()].iter().sum();
        offset += g.len();
        h += rank_sum * rank_sum / g.len() as f64;
    }
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    let tie_correction = 1.0 - tie_sum / (n * n * n - n);
    if tie_correction <= 0.0 {
        return Err(SurveyError::InvalidParameter(
            "all observations are identical".to_string(),
        ));
    }
    h /= tie_correction;

    let df = groups.len() - 1;
    let chi2 = ChiSquared::new(df as f64)
        .map_err(|e| SurveyError::InvalidParameter(e.to_string()))?;
    let p_value = (1.0 - chi2.cdf(h)).clamp(0.0, 1.0);

    Ok(KruskalWallisResult { h, df, p_value })
}

// ---------------------------------------------------------------------------
// Mann–Whitney U
// ---------------------------------------------------------------------------

/// Two-sided Mann–Whitney U test (normal approximation with tie and
/// continuity corrections).
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<MannWhitneyResult, SurveyError> {
    validate_groups(&[a, b], 2)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n = n1 + n2;
    let mut pooled = a.to_vec();
    pooled.extend_from_slice(b);
    let (ranks, tie_sum) = midranks(&pooled);

    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let u = rank_sum_a - n1 * (n1 + 1.0) / 2.0;

    let mean_u = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_sum / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(SurveyError::InvalidParameter(
            "all observations are identical".to_string(),
        ));
    }

    let z = ((u - mean_u).abs() - 0.5).max(0.0) / variance.sqrt();
    let p_value = (2.0 * normal_sf(z)?).clamp(0.0, 1.0);

    Ok(MannWhitneyResult { u, z, p_value })
}

// ---------------------------------------------------------------------------
// Dunn's post-hoc
// ---------------------------------------------------------------------------

/// Dunn's pairwise post-hoc comparisons over all group pairs, with
/// Bonferroni adjustment. Run after a significant Kruskal–Wallis result to
/// find which groups actually differ.
pub fn dunn_bonferroni(groups: &[&[f64]]) -> Result<Vec<DunnComparison>, SurveyError> {
    validate_groups(groups, 2)?;

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    let (ranks, tie_sum) = midranks(&pooled);

    let mut mean_ranks = Vec::with_capacity(groups.len());
    let mut offset = 0;
    for g in groups {
        let rank_sum: f64 = ranks[offset..offset + g.len()].iter().sum();
        offset += g.len();
        mean_ranks.push(rank_sum / g.len() as f64);
    }

    let base_variance = n * (n + 1.0) / 12.0 - tie_sum / (12.0 * (n - 1.0));
    if base_variance <= 0.0 {
        return Err(SurveyError::InvalidParameter(
            "all observations are identical".to_string(),
        ));
    }

    let k = groups.len();
    let pair_count = (k * (k - 1) / 2) as f64;
    let mut comparisons = Vec::new();
    for i in 0..k {
        for j in (i + 1)..k {
            let pooled_variance =
                base_variance * (1.0 / groups[i].len() as f64 + 1.0 / groups[j].len() as f64);
            let z = (mean_ranks[i] - mean_ranks[j]) / pooled_variance.sqrt();
            let p = 2.0 * normal_sf(z.abs())?;
            comparisons.push(DunnComparison {
                group_a: i,
                group_b: j,
                z,
                p_adjusted: (p * pair_count).clamp(0.0, 1.0),
            });
        }
    }
    Ok(comparisons)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Fixture samples; expected values were computed with the standard
    // tie-corrected formulas (chi-squared df=2 survival is exp(-h/2),
    // normal tails via erfc).
    const A: [f64; 5] = [2.9, 3.0, 2.5, 2.6, 3.2];
    const B: [f64; 4] = [3.8, 2.7, 4.0, 2.4];
    const C: [f64; 5] = [2.8, 3.4, 3.7, 2.2, 2.0];

    #[test]
    fn test_midranks_without_ties_are_permutation_of_integers() {
        let (ranks, tie_sum) = midranks(&[3.0, 1.0, 2.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert_eq!(tie_sum, 0.0);
    }

    #[test]
    fn test_midranks_average_over_ties() {
        let (ranks, tie_sum) = midranks(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
        // One tie group of 2: 2^3 - 2 = 6.
        assert_eq!(tie_sum, 6.0);
    }

    #[test]
    fn test_kruskal_wallis_three_groups() {
        let result = kruskal_wallis(&[&A, &B, &C]).unwrap();
        assert_eq!(result.df, 2);
        assert!((result.h - 0.771428571429).abs() < 1e-9, "h = {}", result.h);
        assert!(
            (result.p_value - 0.679964773579).abs() < 1e-9,
            "p = {}",
            result.p_value
        );
    }

    #[test]
    fn test_kruskal_wallis_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 3.0, 5.0];
        let result = kruskal_wallis(&[&x, &y]).unwrap();
        assert!((result.h - 1.028571428571).abs() < 1e-9, "h = {}", result.h);
    }

    #[test]
    fn test_kruskal_wallis_identical_groups_is_high_p() {
        let g = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = kruskal_wallis(&[&g, &g, &g]).unwrap();
        assert!(result.h < 1e-9);
        assert!(result.p_value > 0.999);
    }

    #[test]
    fn test_kruskal_wallis_rejects_empty_group() {
        let empty: [f64; 0] = [];
        assert!(matches!(
            kruskal_wallis(&[&A, &empty]),
            Err(SurveyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_kruskal_wallis_all_identical_observations_is_error() {
        let g1 = [2.0, 2.0, 2.0];
        let g2 = [2.0, 2.0];
        assert!(matches!(
            kruskal_wallis(&[&g1, &g2]),
            Err(SurveyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_mann_whitney_two_sided() {
        let result = mann_whitney_u(&A, &B).unwrap();
        assert_eq!(result.u, 8.0);
        assert!((result.z - 0.367423461417).abs() < 1e-9, "z = {}", result.z);
        assert!(
            (result.p_value - 0.713303173878).abs() < 1e-9,
            "p = {}",
            result.p_value
        );
    }

    #[test]
    fn test_mann_whitney_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 3.0, 5.0];
        let result = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(result.u, 6.0);
        assert!((result.z - 0.887411967465).abs() < 1e-9, "z = {}", result.z);
        assert!(
            (result.p_value - 0.374857142683).abs() < 1e-9,
            "p = {}",
            result.p_value
        );
    }

    #[test]
    fn test_mann_whitney_clearly_separated_samples() {
        let low = [1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7];
        let high = [9.0, 9.1, 9.2, 9.3, 9.4, 9.5, 9.6, 9.7];
        let result = mann_whitney_u(&low, &high).unwrap();
        assert_eq!(result.u, 0.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_dunn_bonferroni_pair_count_and_symmetry() {
        let comparisons = dunn_bonferroni(&[&A, &B, &C]).unwrap();
        assert_eq!(comparisons.len(), 3);
        let ab = &comparisons[0];
        assert_eq!((ab.group_a, ab.group_b), (0, 1));
        assert!((ab.z - -0.641426980590).abs() < 1e-9, "z = {}", ab.z);
        // Homogeneous samples: every adjusted p saturates at 1.
        for c in &comparisons {
            assert_eq!(c.p_adjusted, 1.0);
        }
    }

    #[test]
    fn test_dunn_bonferroni_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [2.0, 3.0, 3.0, 5.0];
        let w = [1.5, 2.5, 2.0];
        let comparisons = dunn_bonferroni(&[&x, &y, &w]).unwrap();
        let xy = &comparisons[0];
        assert!((xy.z - -1.112884104214).abs() < 1e-9, "z = {}", xy.z);
        assert!(
            (xy.p_adjusted - 0.797274623500).abs() < 1e-9,
            "p = {}",
            xy.p_adjusted
        );
        let yw = &comparisons[2];
        assert!(
            (yw.p_adjusted - 0.373611943883).abs() < 1e-9,
            "p = {}",
            yw.p_adjusted
        );
    }

    #[test]
    fn test_dunn_adjustment_never_exceeds_one() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [1.5, 2.5, 3.5];
        let g3 = [2.0, 3.0, 4.0];
        let g4 = [2.5, 3.5, 4.5];
        for c in dunn_bonferroni(&[&g1, &g2, &g3, &g4]).unwrap() {
            assert!(c.p_adjusted <= 1.0);
            assert!(c.p_adjusted >= 0.0);
        }
    }
}
