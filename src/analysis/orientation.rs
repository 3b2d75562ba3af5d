//! Fracture orientation rose-sector binning.
//!
//! A fracture trace has no inherent direction, so each bearing is mirrored
//! across 180° and both copies are binned; the resulting rose is
//! bidirectional. Sectors are right-closed 10° wedges around the compass,
//! counted per fracture assemblage.

use serde::Serialize;

use crate::ingest::tables::OrientationRecord;
use crate::model::{Assemblage, SurveyError};

/// Default rose sector width, degrees.
pub const DEFAULT_SECTOR_WIDTH_DEG: f64 = 10.0;

/// Sector counts for one assemblage. `sector_counts[i]` covers the
/// right-closed wedge `(i*w, (i+1)*w]` degrees clockwise from north.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoseDiagram {
    pub assemblage: Assemblage,
    /// Measurements before mirroring.
    pub n_measurements: usize,
    pub sector_width_deg: f64,
    pub sector_counts: Vec<u32>,
}

/// Mirrors each bearing across 180° and returns the original set followed
/// by the mirrored copies. A bearing of exactly 180° maps onto itself.
pub fn mirror_bearings(bearings: &[f64]) -> Vec<f64> {
    let mut doubled = bearings.to_vec();
    doubled.extend(bearings.iter().map(|&b| {
        if b < 180.0 {
            b + 180.0
        } else if b > 180.0 {
            b - 180.0
        } else {
            b
        }
    }));
    doubled
}

/// Bins bearings into right-closed sectors of `sector_width_deg`.
///
/// Bearings outside `(0, 360]` fall into no sector and are dropped; a
/// bearing of exactly 0 is one of them, though its mirror at 180° still
/// counts.
pub fn bin_sectors(bearings: &[f64], sector_width_deg: f64) -> Result<Vec<u32>, SurveyError> {
    if !(sector_width_deg > 0.0) || (360.0 / sector_width_deg).fract() != 0.0 {
        return Err(SurveyError::InvalidParameter(format!(
            "sector width must evenly divide 360 degrees, got {}",
            sector_width_deg
        )));
    }
    let sectors = (360.0 / sector_width_deg) as usize;
    let mut counts = vec![0u32; sectors];
    for &b in bearings {
        if !(b > 0.0 && b <= 360.0) {
            continue;
        }
        let idx = (b / sector_width_deg).ceil() as usize - 1;
        counts[idx] += 1;
    }
    Ok(counts)
}

/// Builds one mirrored rose diagram per assemblage, in workbook id order.
pub fn analyze(
    records: &[OrientationRecord],
    sector_width_deg: f64,
) -> Result<Vec<RoseDiagram>, SurveyError> {
    Assemblage::ALL
        .iter()
        .map(|&assemblage| {
            let bearings: Vec<f64> = records
                .iter()
                .filter(|r| r.assemblage == assemblage)
                .map(|r| r.bearing_deg)
                .collect();
            let sector_counts = bin_sectors(&mirror_bearings(&bearings), sector_width_deg)?;
            Ok(RoseDiagram {
                assemblage,
                n_measurements: bearings.len(),
                sector_width_deg,
                sector_counts,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bearing_deg: f64, assemblage: Assemblage) -> OrientationRecord {
        OrientationRecord { bearing_deg, assemblage }
    }

    #[test]
    fn test_mirror_doubles_and_flips() {
        let mirrored = mirror_bearings(&[10.0, 200.0, 180.0]);
        assert_eq!(mirrored, vec![10.0, 200.0, 180.0, 190.0, 20.0, 180.0]);
    }

    #[test]
    fn test_bin_sectors_right_closed_edges() {
        // 10 falls in the first wedge (0, 10]; 10.1 in the second.
        let counts = bin_sectors(&[10.0, 10.1, 360.0], 10.0).unwrap();
        assert_eq!(counts.len(), 36);
        assert_eq!(counts[0], 1);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[35], 1);
    }

    #[test]
    fn test_bin_sectors_drops_zero_and_out_of_range() {
        let counts = bin_sectors(&[0.0, -5.0, 361.0], 10.0).unwrap();
        assert_eq!(counts.iter().sum::<u32>(), 0);
    }

    #[test]
    fn test_bin_sectors_rejects_width_not_dividing_circle() {
        assert!(bin_sectors(&[10.0], 7.0).is_err());
        assert!(bin_sectors(&[10.0], 0.0).is_err());
    }

    #[test]
    fn test_analyze_mirrors_within_each_assemblage() {
        let records = vec![
            record(45.0, Assemblage::CarbonateThalweg),
            record(45.0, Assemblage::CarbonateThalweg),
            record(300.0, Assemblage::FineSandstone),
        ];
        let roses = analyze(&records, DEFAULT_SECTOR_WIDTH_DEG).unwrap();
        assert_eq!(roses.len(), 4);

        let thalweg = &roses[0];
        assert_eq!(thalweg.n_measurements, 2);
        // Two bearings at 45 plus their mirrors at 225.
        assert_eq!(thalweg.sector_counts[4], 2);
        assert_eq!(thalweg.sector_counts[22], 2);
        assert_eq!(thalweg.sector_counts.iter().sum::<u32>(), 4);

        let fine = &roses[2];
        assert_eq!(fine.sector_counts[29], 1); // 300 -> wedge (290, 300]
        assert_eq!(fine.sector_counts[11], 1); // mirror 120 -> (110, 120]
        assert_eq!(roses[1].sector_counts.iter().sum::<u32>(), 0);
    }
}
