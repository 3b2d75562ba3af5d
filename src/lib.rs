//! Field-survey analysis for the Dry Fork bedrock channel study.
//!
//! Loads the campaign's flat tables — channel cross-section transects,
//! bed thickness, fracture spacing, fracture orientations, and point-load
//! strength — computes descriptive statistics, derived channel geometry
//! (roughness and hypsometry via the densify/resample kernel), and
//! nonparametric group comparisons, and emits JSON reports for the
//! plotting and review tooling downstream.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod resample;
pub mod surveys;
