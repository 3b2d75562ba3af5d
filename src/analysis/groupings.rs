//! Lithology grouping of loaded surveys.
//!
//! The comparisons downstream are all per-rock-unit; this module turns the
//! flat corpus into per-lithology views while preserving registry order
//! within each group.

use crate::model::{CrossSectionSurvey, Lithology};

/// All surveys belonging to one lithology, in corpus order.
pub struct LithologyGroup<'a> {
    pub lithology: Lithology,
    pub surveys: Vec<&'a CrossSectionSurvey>,
}

/// Partitions surveys into the three lithology groups, in canonical order
/// (carbonate, coarse, fine). Groups may be empty if every survey of a
/// unit failed to load; callers decide whether that sinks their analysis.
pub fn group_by_lithology(surveys: &[CrossSectionSurvey]) -> Vec<LithologyGroup<'_>> {
    Lithology::ALL
        .iter()
        .map(|&lithology| LithologyGroup {
            lithology,
            surveys: surveys.iter().filter(|s| s.lithology == lithology).collect(),
        })
        .collect()
}
