//! Run configuration.
//!
//! A batch run is parameterized by a small TOML file: where the data
//! lives, where reports go, and the numeric knobs of the resampling and
//! histogram steps. Every field has a default matching the published
//! analysis, so an empty file (or no file) reproduces the reference run.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analysis::{hypsometry, roughness};
use crate::model::SurveyError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub data: DataConfig,
    pub resample: ResampleConfig,
    pub hypsometry: HistogramConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Directory holding the 30 transect CSVs.
    pub cross_section_dir: PathBuf,
    pub bed_thickness_file: PathBuf,
    pub fracture_spacing_file: PathBuf,
    pub orientation_file: PathBuf,
    pub strength_file: PathBuf,
    /// Directory the JSON reports are written into.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResampleConfig {
    /// Densify step for the roughness analysis (m).
    pub roughness_dx: f64,
    /// Densify step for the hypsometry analysis (m).
    pub hypsometry_dx: f64,
    /// Common resampling interval for elevation pooling (m).
    pub sample_spacing: f64,
    /// Sampling-interval ladder for the roughness analysis (m).
    pub spacings: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistogramConfig {
    pub min_m: f64,
    pub max_m: f64,
    pub bin_width_m: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            cross_section_dir: PathBuf::from("data/cross_section_form"),
            bed_thickness_file: PathBuf::from("data/bed_and_fracture_spacing/bedding_thickness.csv"),
            fracture_spacing_file: PathBuf::from(
                "data/bed_and_fracture_spacing/fracture_spacing.csv",
            ),
            orientation_file: PathBuf::from("data/fracture_orientation/fracture_orientations.csv"),
            strength_file: PathBuf::from("data/rock_strength/strength_data.csv"),
            output_dir: PathBuf::from("reports"),
        }
    }
}

impl Default for ResampleConfig {
    fn default() -> Self {
        ResampleConfig {
            roughness_dx: roughness::DEFAULT_DX,
            hypsometry_dx: hypsometry::DEFAULT_DX,
            sample_spacing: hypsometry::DEFAULT_SAMPLE_SPACING,
            spacings: roughness::DEFAULT_SPACINGS.to_vec(),
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        HistogramConfig {
            min_m: hypsometry::DEFAULT_HIST_MIN,
            max_m: hypsometry::DEFAULT_HIST_MAX,
            bin_width_m: hypsometry::DEFAULT_BIN_WIDTH,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data: DataConfig::default(),
            resample: ResampleConfig::default(),
            hypsometry: HistogramConfig::default(),
        }
    }
}

impl RunConfig {
    /// Loads a config file, falling back to defaults for absent fields.
    pub fn load(path: &Path) -> Result<RunConfig, SurveyError> {
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SurveyError::Io {
            file: file.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&file, &content)
    }

    /// Parses TOML config content.
    pub fn parse(file: &str, content: &str) -> Result<RunConfig, SurveyError> {
        let config: RunConfig = toml::from_str(content).map_err(|e| SurveyError::Parse {
            file: file.to_string(),
            line: 0,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SurveyError> {
        for (name, value) in [
            ("resample.roughness_dx", self.resample.roughness_dx),
            ("resample.hypsometry_dx", self.resample.hypsometry_dx),
            ("resample.sample_spacing", self.resample.sample_spacing),
            ("hypsometry.bin_width_m", self.hypsometry.bin_width_m),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SurveyError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.resample.spacings.is_empty() {
            return Err(SurveyError::InvalidParameter(
                "resample.spacings must not be empty".to_string(),
            ));
        }
        if self
            .resample
            .spacings
            .iter()
            .any(|s| !(*s > 0.0) || !s.is_finite())
        {
            return Err(SurveyError::InvalidParameter(
                "resample.spacings entries must be positive".to_string(),
            ));
        }
        if !(self.hypsometry.max_m > self.hypsometry.min_m) {
            return Err(SurveyError::InvalidParameter(format!(
                "hypsometry domain [{}, {}) is empty",
                self.hypsometry.min_m, self.hypsometry.max_m
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = RunConfig::default();
        assert_eq!(config.resample.roughness_dx, 0.1);
        assert_eq!(config.resample.hypsometry_dx, 0.01);
        assert_eq!(config.resample.sample_spacing, 0.1);
        assert_eq!(config.resample.spacings.len(), 28);
        assert_eq!(config.resample.spacings[0], 0.1);
        assert_eq!(config.resample.spacings[27], 10.0);
        assert_eq!(config.hypsometry.max_m, 4.0);
        assert_eq!(config.hypsometry.bin_width_m, 0.1);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config = RunConfig::parse("run.toml", "").unwrap();
        assert_eq!(config.resample.sample_spacing, 0.1);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let content = "\
[data]
cross_section_dir = \"/srv/surveys/xs\"

[resample]
sample_spacing = 0.2
";
        let config = RunConfig::parse("run.toml", content).unwrap();
        assert_eq!(
            config.data.cross_section_dir,
            PathBuf::from("/srv/surveys/xs")
        );
        assert_eq!(config.resample.sample_spacing, 0.2);
        assert_eq!(config.resample.roughness_dx, 0.1);
        assert_eq!(config.hypsometry.max_m, 4.0);
    }

    #[test]
    fn test_nonpositive_knob_is_rejected() {
        let content = "[resample]\nsample_spacing = -0.1\n";
        assert!(matches!(
            RunConfig::parse("run.toml", content),
            Err(SurveyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let content = "[resample]\nsample_spcaing = 0.1\n";
        assert!(matches!(
            RunConfig::parse("run.toml", content),
            Err(SurveyError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_spacings_rejected() {
        let content = "[resample]\nspacings = []\n";
        assert!(RunConfig::parse("run.toml", content).is_err());
    }
}
