//! Batch driver: load the corpus, run the five analyses, write the report.
//!
//! Usage: `dryfork_survey [run.toml]`. With no argument, the reference
//! configuration is used (data under `data/`, reports under `reports/`).

use std::path::Path;
use std::process::ExitCode;

use dryfork_survey::analysis::{hypsometry, orientation, roughness, spacing, strength};
use dryfork_survey::config::RunConfig;
use dryfork_survey::ingest::{tables, transects};
use dryfork_survey::logging::{self, Dataset, LogLevel};
use dryfork_survey::report::{self, RunReport};

fn main() -> ExitCode {
    logging::init_logger(LogLevel::Info, None);

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            logging::error(Dataset::System, None, &message);
            return ExitCode::FAILURE;
        }
    };

    let (surveys, load_failures) = transects::load_corpus(&config.data.cross_section_dir);

    let roughness_result = roughness::analyze(
        &surveys,
        &config.resample.spacings,
        config.resample.roughness_dx,
    );
    let hypsometry_result = hypsometry::analyze(
        &surveys,
        config.resample.hypsometry_dx,
        config.resample.sample_spacing,
        config.hypsometry.min_m,
        config.hypsometry.max_m,
        config.hypsometry.bin_width_m,
    );
    let spacing_result = tables::load_bed_thickness(&config.data.bed_thickness_file)
        .and_then(|beds| {
            let fracs = tables::load_fracture_spacing(&config.data.fracture_spacing_file)?;
            spacing::analyze(&beds, &fracs)
        });
    let orientation_result = tables::load_orientations(&config.data.orientation_file)
        .and_then(|records| {
            orientation::analyze(&records, orientation::DEFAULT_SECTOR_WIDTH_DEG)
        });
    let strength_result = tables::load_strength(&config.data.strength_file)
        .and_then(|table| strength::analyze(&table));

    for (name, ok) in [
        ("roughness", roughness_result.is_ok()),
        ("hypsometry", hypsometry_result.is_ok()),
        ("spacing", spacing_result.is_ok()),
        ("orientation", orientation_result.is_ok()),
        ("strength", strength_result.is_ok()),
    ] {
        if ok {
            logging::info(Dataset::System, None, &format!("{} analysis complete", name));
        } else {
            logging::error(Dataset::System, None, &format!("{} analysis failed", name));
        }
    }

    let report = RunReport::new(
        load_failures,
        surveys.len(),
        roughness_result,
        hypsometry_result,
        spacing_result,
        orientation_result,
        strength_result,
    );

    let all_failed = report.all_failed();
    match report::write_report(&config.data.output_dir, &report) {
        Ok(path) => {
            logging::info(
                Dataset::System,
                None,
                &format!("report written to {}", path.display()),
            );
        }
        Err(err) => {
            logging::error(Dataset::System, None, &format!("report write failed: {}", err));
            return ExitCode::FAILURE;
        }
    }

    if all_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load_config() -> Result<RunConfig, String> {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(path) => RunConfig::load(Path::new(&path))
            .map_err(|e| format!("could not load config {}: {}", path, e)),
        None => Ok(RunConfig::default()),
    }
}
