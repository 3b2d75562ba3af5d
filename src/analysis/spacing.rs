//! Bed thickness and fracture spacing comparisons.
//!
//! Summarizes the two discontinuity-spacing tables (means and deviations
//! per group, with the carbonate fracture set split into thalweg and bank
//! transects) and runs the full battery of group tests: three-way and
//! four-way Kruskal–Wallis with Dunn follow-up, plus the pooled
//! sandstone-versus-carbonate Mann–Whitney comparisons.

use serde::Serialize;

use crate::analysis::descriptive::{mean, std_dev};
use crate::analysis::nonparametric::{
    dunn_bonferroni, kruskal_wallis, mann_whitney_u, DunnComparison, KruskalWallisResult,
    MannWhitneyResult,
};
use crate::ingest::tables::{BedThicknessTable, FractureSpacingTable};
use crate::model::SurveyError;

/// Mean and deviation for one labeled sample, as drawn on the crossplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSample {
    pub label: String,
    pub n: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl GroupSample {
    fn new(label: &str, values: &[f64]) -> GroupSample {
        GroupSample {
            label: label.to_string(),
            n: values.len(),
            mean: mean(values),
            std_dev: std_dev(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingAnalysis {
    /// Bed thickness (cm): fine, coarse, carbonate.
    pub bed_thickness: Vec<GroupSample>,
    /// Fracture spacing (cm): fine, coarse, carbonate thalweg, carbonate bank.
    pub fracture_spacing: Vec<GroupSample>,

    pub beds_kruskal: KruskalWallisResult,
    /// Dunn over (fine, coarse, carbonate) bed thickness.
    pub beds_dunn: Vec<DunnComparison>,
    /// Pooled sandstone vs. carbonate bed thickness.
    pub beds_sandstone_vs_carbonate: MannWhitneyResult,

    /// Four-way over (fine, coarse, carb thalweg, carb bank).
    pub fracs_kruskal: KruskalWallisResult,
    pub fracs_dunn: Vec<DunnComparison>,
    /// Three-way with both carbonate sets lumped.
    pub fracs_kruskal_lumped: KruskalWallisResult,
    pub fracs_dunn_lumped: Vec<DunnComparison>,
    /// Pooled sandstone vs. all carbonate fracture spacing.
    pub fracs_sandstone_vs_carbonate: MannWhitneyResult,
}

/// Runs the bed-thickness / fracture-spacing analysis.
pub fn analyze(
    beds: &BedThicknessTable,
    fracs: &FractureSpacingTable,
) -> Result<SpacingAnalysis, SurveyError> {
    let bed_thickness = vec![
        GroupSample::new("fine_sandstone", &beds.fine),
        GroupSample::new("coarse_sandstone", &beds.coarse),
        GroupSample::new("carbonate", &beds.carbonate),
    ];
    let fracture_spacing = vec![
        GroupSample::new("fine_sandstone", &fracs.fine_cm),
        GroupSample::new("coarse_sandstone", &fracs.coarse_cm),
        GroupSample::new("carbonate_thalweg", &fracs.carbonate_thalweg_cm),
        GroupSample::new("carbonate_bank", &fracs.carbonate_bank_cm),
    ];

    let beds_kruskal = kruskal_wallis(&[&beds.fine, &beds.coarse, &beds.carbonate])?;
    let beds_dunn = dunn_bonferroni(&[&beds.fine, &beds.coarse, &beds.carbonate])?;
    let mut beds_sandstone = beds.fine.clone();
    beds_sandstone.extend_from_slice(&beds.coarse);
    let beds_sandstone_vs_carbonate = mann_whitney_u(&beds_sandstone, &beds.carbonate)?;

    let four_way: [&[f64]; 4] = [
        &fracs.fine_cm,
        &fracs.coarse_cm,
        &fracs.carbonate_thalweg_cm,
        &fracs.carbonate_bank_cm,
    ];
    let fracs_kruskal = kruskal_wallis(&four_way)?;
    let fracs_dunn = dunn_bonferroni(&four_way)?;

    let carbonate_all = fracs.carbonate_all_cm();
    let lumped: [&[f64]; 3] = [&fracs.fine_cm, &fracs.coarse_cm, &carbonate_all];
    let fracs_kruskal_lumped = kruskal_wallis(&lumped)?;
    let fracs_dunn_lumped = dunn_bonferroni(&lumped)?;

    let mut fracs_sandstone = fracs.fine_cm.clone();
    fracs_sandstone.extend_from_slice(&fracs.coarse_cm);
    let fracs_sandstone_vs_carbonate = mann_whitney_u(&fracs_sandstone, &carbonate_all)?;

    Ok(SpacingAnalysis {
        bed_thickness,
        fracture_spacing,
        beds_kruskal,
        beds_dunn,
        beds_sandstone_vs_carbonate,
        fracs_kruskal,
        fracs_dunn,
        fracs_kruskal_lumped,
        fracs_dunn_lumped,
        fracs_sandstone_vs_carbonate,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn beds() -> BedThicknessTable {
        BedThicknessTable {
            fine: vec![8.0, 10.0, 12.0, 9.0, 11.0],
            coarse: vec![30.0, 35.0, 40.0, 32.0],
            carbonate: vec![38.0, 42.0, 45.0, 40.0, 41.0],
        }
    }

    fn fracs() -> FractureSpacingTable {
        FractureSpacingTable {
            fine_cm: vec![20.0, 25.0, 30.0, 22.0],
            coarse_cm: vec![60.0, 70.0, 80.0, 65.0],
            carbonate_thalweg_cm: vec![120.0, 150.0, 140.0],
            carbonate_bank_cm: vec![250.0, 300.0, 280.0],
            unclassified_carbonate: 0,
        }
    }

    #[test]
    fn test_group_samples_carry_means_and_deviations() {
        let result = analyze(&beds(), &fracs()).unwrap();
        assert_eq!(result.bed_thickness.len(), 3);
        assert_eq!(result.bed_thickness[0].label, "fine_sandstone");
        assert_eq!(result.bed_thickness[0].n, 5);
        assert!((result.bed_thickness[0].mean.unwrap() - 10.0).abs() < 1e-12);
        assert!(result.bed_thickness[0].std_dev.is_some());
        assert_eq!(result.fracture_spacing.len(), 4);
        assert_eq!(result.fracture_spacing[3].label, "carbonate_bank");
    }

    #[test]
    fn test_separated_groups_yield_small_p_values() {
        // Fine beds are much thinner than coarse and carbonate beds; the
        // three-way test and the pooled comparison should both notice.
        let result = analyze(&beds(), &fracs()).unwrap();
        assert!(result.beds_kruskal.p_value < 0.05);
        assert!(result.fracs_kruskal.p_value < 0.05);
        assert!(result.fracs_sandstone_vs_carbonate.p_value < 0.05);
    }

    #[test]
    fn test_dunn_pair_counts_match_group_counts() {
        let result = analyze(&beds(), &fracs()).unwrap();
        assert_eq!(result.beds_dunn.len(), 3); // 3 groups -> 3 pairs
        assert_eq!(result.fracs_dunn.len(), 6); // 4 groups -> 6 pairs
        assert_eq!(result.fracs_dunn_lumped.len(), 3);
    }

    #[test]
    fn test_empty_group_fails_the_analysis() {
        let mut bad = beds();
        bad.coarse.clear();
        assert!(matches!(
            analyze(&bad, &fracs()),
            Err(SurveyError::InvalidParameter(_))
        ));
    }
}
