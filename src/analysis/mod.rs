//! Analysis pipelines over the loaded survey corpus.
//!
//! Each submodule reproduces one of the field-campaign analyses end to end
//! — descriptive summaries, derived geometry, and the group comparison
//! tests — and returns a serializable result struct for the run report.
//! Rendering of the corresponding figures is a downstream concern; these
//! modules emit the arrays a plotting consumer needs and nothing else.
//!
//! Submodules:
//! - `groupings` — partition surveys by lithology.
//! - `descriptive` — means, deviations, quartiles.
//! - `nonparametric` — Kruskal–Wallis, Mann–Whitney U, Dunn post-hoc.
//! - `roughness` — inflection counts across a ladder of sampling intervals.
//! - `hypsometry` — pooled elevation distributions with bank trimming.
//! - `spacing` — bed thickness and fracture spacing comparisons.
//! - `orientation` — fracture bearing rose-sector counts.
//! - `strength` — point-load index summaries and comparisons.

pub mod descriptive;
pub mod groupings;
pub mod hypsometry;
pub mod nonparametric;
pub mod orientation;
pub mod roughness;
pub mod spacing;
pub mod strength;

use serde::Serialize;

/// A survey excluded from an analysis, with the reason it was dropped.
/// Kept in the result so the report shows exactly which cases are missing
/// from the aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSurvey {
    pub id: String,
    pub reason: String,
}
