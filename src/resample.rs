//! Cross-section densify / resample kernel.
//!
//! A raw transect survey is irregularly spaced: the crew shoots more points
//! where the bed is rough and fewer across planar reaches. Every geometric
//! statistic downstream (inflection counts, hypsometry pools) wants a
//! uniform grid, so the pipeline here is:
//!
//!   survey points → `densify` (linear interpolation onto a fine `dx` grid)
//!                 → `resample` (thin to the analysis sampling interval)
//!                 → `count_inflections` / `trim_to_uniform_banks`
//!
//! Resampling selects every `round(sample_spacing / dx)`-th grid index
//! rather than testing `position mod spacing` with a floating tolerance;
//! the densified grid has a fixed step, so the stride is exact.

use crate::model::{CrossSectionSurvey, DensifiedProfile, ResampledProfile, SurveyError};

/// Densifies a survey onto a uniform grid with step `dx`.
///
/// Points are sorted ascending by position on a working copy (the survey is
/// never mutated). The grid runs from the first surveyed position up to,
/// but excluding, `last + dx`, so the final surveyed position is always
/// covered. Grid positions outside the surveyed range take the nearest
/// endpoint elevation (flat clamp); there is no extrapolation.
///
/// Fails with `InvalidSurvey` if the survey has fewer than 2 points or a
/// non-finite coordinate, and `InvalidParameter` if `dx <= 0`.
pub fn densify(survey: &CrossSectionSurvey, dx: f64) -> Result<DensifiedProfile, SurveyError> {
    if !(dx > 0.0) || !dx.is_finite() {
        return Err(SurveyError::InvalidParameter(format!(
            "densify step dx must be positive and finite, got {}",
            dx
        )));
    }
    if survey.points.len() < 2 {
        return Err(SurveyError::InvalidSurvey(format!(
            "{}: need at least 2 surveyed points, got {}",
            survey.id,
            survey.points.len()
        )));
    }
    if survey
        .points
        .iter()
        .any(|p| !p.position.is_finite() || !p.elevation.is_finite())
    {
        return Err(SurveyError::InvalidSurvey(format!(
            "{}: non-finite coordinate in survey points",
            survey.id
        )));
    }

    let mut points = survey.points.clone();
    points.sort_by(|a, b| {
        a.position
            .partial_cmp(&b.position)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let x0 = points[0].position;
    let x_last = points[points.len() - 1].position;
    let stop = x_last + dx;

    // Index-based grid generation keeps the spacing exactly uniform;
    // accumulating `+= dx` would drift over a few hundred steps.
    let mut x = Vec::new();
    let mut z = Vec::new();
    let mut seg = 0; // current interpolation segment, advances monotonically
    let mut i = 0usize;
    loop {
        let xi = x0 + i as f64 * dx;
        if xi >= stop {
            break;
        }
        x.push(xi);
        z.push(interpolate(&points, &mut seg, xi));
        i += 1;
    }

    Ok(DensifiedProfile { x, z, dx })
}

/// Linear interpolation at `xi` over sorted survey points, with flat
/// clamping outside the surveyed range. `seg` is the caller's cursor into
/// the segment list; queries must arrive in ascending order.
fn interpolate(points: &[crate::model::SurveyPoint], seg: &mut usize, xi: f64) -> f64 {
    let n = points.len();
    if xi <= points[0].position {
        return points[0].elevation;
    }
    if xi >= points[n - 1].position {
        return points[n - 1].elevation;
    }
    while *seg + 1 < n && points[*seg + 1].position < xi {
        *seg += 1;
    }
    let a = points[*seg];
    let b = points[*seg + 1];
    let run = b.position - a.position;
    if run <= 0.0 {
        // Duplicate surveyed position; either elevation is as good.
        return b.elevation;
    }
    a.elevation + (b.elevation - a.elevation) * (xi - a.position) / run
}

/// Thins a densified profile to a coarser sampling interval by selecting
/// every `round(sample_spacing / dx)`-th grid index.
///
/// The first grid position is always retained (stride multiple zero). A
/// `sample_spacing` below `dx` rounds to a stride of 1 and returns the
/// full profile, which is the accepted degenerate case.
///
/// Fails with `InvalidParameter` if `sample_spacing <= 0`.
pub fn resample(
    profile: &DensifiedProfile,
    sample_spacing: f64,
) -> Result<ResampledProfile, SurveyError> {
    if !(sample_spacing > 0.0) || !sample_spacing.is_finite() {
        return Err(SurveyError::InvalidParameter(format!(
            "sample_spacing must be positive and finite, got {}",
            sample_spacing
        )));
    }

    let stride = ((sample_spacing / profile.dx).round() as usize).max(1);
    let x: Vec<f64> = profile.x.iter().copied().step_by(stride).collect();
    let z: Vec<f64> = profile.z.iter().copied().step_by(stride).collect();

    Ok(ResampledProfile { x, z, sample_spacing })
}

/// Counts slope reversals in an elevation sequence.
///
/// Takes the sign of each first difference and counts adjacent sign pairs
/// that differ; a transition through a flat (zero) difference counts once
/// per sign change, never per flat sample. Monotonic sequences and
/// sequences shorter than 3 yield 0.
pub fn count_inflections(z: &[f64]) -> usize {
    if z.len() < 3 {
        return 0;
    }
    let signs: Vec<i8> = z
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            if d > 0.0 {
                1
            } else if d < 0.0 {
                -1
            } else {
                0
            }
        })
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Restricts an elevation sequence to the vertical range surveyed on both
/// banks: elevations strictly below the lesser of the two bank endpoint
/// elevations are retained.
///
/// `left_reference_index` is the sample treated as the left bank (0 unless
/// the transect's registry entry says otherwise); the right bank is always
/// the final sample. Returns an empty vector when the sequence is too short
/// to have two banks or the reference index is out of range.
pub fn trim_to_uniform_banks(z: &[f64], left_reference_index: usize) -> Vec<f64> {
    if z.len() < 2 || left_reference_index >= z.len() {
        return Vec::new();
    }
    let left = z[left_reference_index];
    let right = z[z.len() - 1];
    let ceiling = left.min(right);
    z.iter().copied().filter(|&e| e < ceiling).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lithology, SurveyPoint};

    fn survey(points: &[(f64, f64)]) -> CrossSectionSurvey {
        CrossSectionSurvey {
            id: "test".to_string(),
            lithology: Lithology::Carbonate,
            points: points
                .iter()
                .map(|&(position, elevation)| SurveyPoint { position, elevation })
                .collect(),
            left_reference_index: 0,
        }
    }

    // --- densify ------------------------------------------------------------

    #[test]
    fn test_densify_produces_uniform_grid() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let profile = densify(&s, 0.5).expect("valid survey should densify");
        assert_eq!(profile.x, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(profile.z, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
        for w in profile.x.windows(2) {
            assert!(
                (w[1] - w[0] - 0.5).abs() < 1e-12,
                "grid spacing drifted: {} -> {}",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn test_densify_sorts_unordered_input() {
        let shuffled = survey(&[(2.0, 0.0), (0.0, 0.0), (1.0, 1.0)]);
        let ordered = survey(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(
            densify(&shuffled, 0.5).unwrap(),
            densify(&ordered, 0.5).unwrap()
        );
    }

    #[test]
    fn test_densify_does_not_mutate_survey() {
        let s = survey(&[(2.0, 0.0), (0.0, 0.0), (1.0, 1.0)]);
        let before = s.points.clone();
        densify(&s, 0.5).unwrap();
        assert_eq!(s.points, before, "densify must sort a copy, not the survey");
    }

    #[test]
    fn test_densify_clamps_past_last_surveyed_position() {
        // Grid over [0, 1] at dx = 0.4: x = [0, 0.4, 0.8, 1.2]; the point
        // at 1.2 lies past the survey and takes the endpoint elevation.
        let s = survey(&[(0.0, 0.0), (1.0, 2.0)]);
        let profile = densify(&s, 0.4).unwrap();
        assert_eq!(profile.x.len(), 4);
        assert!((profile.x[3] - 1.2).abs() < 1e-12);
        assert_eq!(profile.z[3], 2.0);
    }

    #[test]
    fn test_densify_with_fewer_than_two_points_is_invalid_survey() {
        let s = survey(&[(0.0, 0.0)]);
        match densify(&s, 0.5) {
            Err(SurveyError::InvalidSurvey(_)) => {}
            other => panic!("expected InvalidSurvey, got {:?}", other),
        }
    }

    #[test]
    fn test_densify_with_nonpositive_dx_is_invalid_parameter() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0)]);
        for dx in [0.0, -0.1, f64::NAN] {
            match densify(&s, dx) {
                Err(SurveyError::InvalidParameter(_)) => {}
                other => panic!("dx = {} should be rejected, got {:?}", dx, other),
            }
        }
    }

    #[test]
    fn test_densify_handles_duplicate_positions() {
        // Re-shot point at the same station: must not divide by zero.
        let s = survey(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.2), (2.0, 0.0)]);
        let profile = densify(&s, 0.5).unwrap();
        assert_eq!(profile.x.len(), 5);
        assert!(profile.z.iter().all(|z| z.is_finite()));
    }

    #[test]
    fn test_densify_nonzero_origin() {
        let s = survey(&[(3.0, 1.0), (5.0, 2.0)]);
        let profile = densify(&s, 1.0).unwrap();
        assert_eq!(profile.x, vec![3.0, 4.0, 5.0]);
        assert_eq!(profile.z, vec![1.0, 1.5, 2.0]);
    }

    // --- resample -----------------------------------------------------------

    #[test]
    fn test_resample_at_dx_is_identity() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let profile = densify(&s, 0.5).unwrap();
        let resampled = resample(&profile, 0.5).unwrap();
        assert_eq!(resampled.x, profile.x);
        assert_eq!(resampled.z, profile.z);
    }

    #[test]
    fn test_resample_selects_stride_multiples() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let profile = densify(&s, 0.5).unwrap();
        let resampled = resample(&profile, 1.0).unwrap();
        assert_eq!(resampled.x, vec![0.0, 1.0, 2.0]);
        assert_eq!(resampled.z, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_resample_always_keeps_first_position() {
        let s = survey(&[(0.0, 0.4), (10.0, 1.0)]);
        let profile = densify(&s, 0.1).unwrap();
        for spacing in [0.1, 0.3, 1.0, 7.0, 100.0] {
            let resampled = resample(&profile, spacing).unwrap();
            assert_eq!(resampled.x[0], profile.x[0], "spacing {}", spacing);
        }
    }

    #[test]
    fn test_resample_spacing_below_dx_returns_full_profile() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0)]);
        let profile = densify(&s, 0.5).unwrap();
        let resampled = resample(&profile, 0.01).unwrap();
        assert_eq!(resampled.x.len(), profile.x.len());
    }

    #[test]
    fn test_resample_rejects_nonpositive_spacing() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0)]);
        let profile = densify(&s, 0.5).unwrap();
        match resample(&profile, 0.0) {
            Err(SurveyError::InvalidParameter(_)) => {}
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    // --- count_inflections ---------------------------------------------------

    #[test]
    fn test_monotonic_sequence_has_no_inflections() {
        assert_eq!(count_inflections(&[0.0, 1.0, 2.0, 3.0, 4.0]), 0);
        assert_eq!(count_inflections(&[4.0, 3.0, 1.0, 0.5]), 0);
    }

    #[test]
    fn test_sawtooth_inflects_at_each_interior_point() {
        assert_eq!(count_inflections(&[0.0, 1.0, 0.0, 1.0, 0.0]), 3);
    }

    #[test]
    fn test_short_sequences_have_no_inflections() {
        assert_eq!(count_inflections(&[]), 0);
        assert_eq!(count_inflections(&[1.0]), 0);
        assert_eq!(count_inflections(&[1.0, 5.0]), 0);
    }

    #[test]
    fn test_flat_run_is_not_double_counted() {
        // rise, flat, flat, rise: sign sequence [1, 0, 0, 1] has two
        // transitions (into and out of the flat), not three.
        assert_eq!(count_inflections(&[0.0, 1.0, 1.0, 1.0, 2.0]), 2);
    }

    #[test]
    fn test_single_peak_has_one_inflection() {
        assert_eq!(count_inflections(&[0.0, 1.0, 0.0]), 1);
    }

    // --- trim_to_uniform_banks -----------------------------------------------

    #[test]
    fn test_trim_keeps_elevations_below_lower_bank() {
        let trimmed = trim_to_uniform_banks(&[2.0, 0.5, 1.0, 0.3, 1.5], 0);
        assert_eq!(trimmed, vec![0.5, 1.0, 0.3]);
    }

    #[test]
    fn test_trim_with_left_reference_override() {
        // First sample is an off-bank outlier; reference index 1 makes the
        // ceiling min(0.9, 1.5) = 0.9 instead of min(2.0, 1.5) = 1.5.
        let z = [2.0, 0.9, 0.5, 0.3, 1.5];
        assert_eq!(trim_to_uniform_banks(&z, 1), vec![0.5, 0.3]);
        assert_eq!(trim_to_uniform_banks(&z, 0), vec![0.9, 0.5, 0.3]);
    }

    #[test]
    fn test_trim_is_strict_inequality() {
        // An elevation exactly at the ceiling is on the bank, not below it.
        assert_eq!(trim_to_uniform_banks(&[1.0, 1.0, 0.5, 1.0], 0), vec![0.5]);
    }

    #[test]
    fn test_trim_degenerate_inputs_yield_empty() {
        assert!(trim_to_uniform_banks(&[], 0).is_empty());
        assert!(trim_to_uniform_banks(&[1.0], 0).is_empty());
        assert!(trim_to_uniform_banks(&[1.0, 2.0, 3.0], 7).is_empty());
    }

    // --- full pipeline -------------------------------------------------------

    #[test]
    fn test_triangle_scenario_end_to_end() {
        let s = survey(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let profile = densify(&s, 0.5).unwrap();
        assert_eq!(profile.x, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(profile.z, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
        let resampled = resample(&profile, 1.0).unwrap();
        assert_eq!(resampled.z, vec![0.0, 1.0, 0.0]);
        assert_eq!(count_inflections(&resampled.z), 1);
    }
}
