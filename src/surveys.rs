//! Transect registry for the Dry Fork survey corpus.
//!
//! Defines the canonical list of surveyed channel cross-sections, along with
//! their lithology class and any per-transect analysis metadata. This is the
//! single source of truth for transect identifiers — all other modules
//! should reference transects from here rather than hardcoding file names.

use crate::model::Lithology;

/// Metadata for a single surveyed transect.
pub struct Transect {
    /// Identifier and CSV file stem, e.g. "DFC_3" → `DFC_3.csv`.
    pub id: &'static str,
    /// Rock unit the transect crosses.
    pub lithology: Lithology,
    /// Index of the sample used as the left bank reference when trimming
    /// elevations to the lower of the two surveyed banks. Almost always 0;
    /// DFSSF_1 uses 1 because its first surveyed point sits on a boulder
    /// off the true bank line.
    pub left_reference_index: usize,
}

const fn transect(id: &'static str, lithology: Lithology) -> Transect {
    Transect { id, lithology, left_reference_index: 0 }
}

/// All surveyed transects, in corpus order: ten carbonate, ten coarse
/// sandstone, ten fine sandstone. Pooled statistics and the roughness table
/// preserve this ordering.
pub static TRANSECT_REGISTRY: &[Transect] = &[
    transect("DFC_1", Lithology::Carbonate),
    transect("DFC_2", Lithology::Carbonate),
    transect("DFC_3", Lithology::Carbonate),
    transect("DFC_4", Lithology::Carbonate),
    transect("DFC_5", Lithology::Carbonate),
    transect("DFC_6", Lithology::Carbonate),
    transect("DFC_7", Lithology::Carbonate),
    transect("DFC_8", Lithology::Carbonate),
    transect("DFC_9", Lithology::Carbonate),
    transect("DFC_10", Lithology::Carbonate),
    transect("DFSSC_1", Lithology::CoarseSandstone),
    transect("DFSSC_2", Lithology::CoarseSandstone),
    transect("DFSSC_3", Lithology::CoarseSandstone),
    transect("DFSSC_4", Lithology::CoarseSandstone),
    transect("DFSSC_5", Lithology::CoarseSandstone),
    transect("DFSSC_6", Lithology::CoarseSandstone),
    transect("DFSSC_7", Lithology::CoarseSandstone),
    transect("DFSSC_8", Lithology::CoarseSandstone),
    transect("DFSSC_9", Lithology::CoarseSandstone),
    transect("DFSSC_10", Lithology::CoarseSandstone),
    Transect {
        id: "DFSSF_1",
        lithology: Lithology::FineSandstone,
        left_reference_index: 1,
    },
    transect("DFSSF_2", Lithology::FineSandstone),
    transect("DFSSF_3", Lithology::FineSandstone),
    transect("DFSSF_4", Lithology::FineSandstone),
    transect("DFSSF_5", Lithology::FineSandstone),
    transect("DFSSF_6", Lithology::FineSandstone),
    transect("DFSSF_7", Lithology::FineSandstone),
    transect("DFSSF_8", Lithology::FineSandstone),
    transect("DFSSF_9", Lithology::FineSandstone),
    transect("DFSSF_10", Lithology::FineSandstone),
];

/// CSV file name for a transect id.
pub fn csv_file_name(id: &str) -> String {
    format!("{}.csv", id)
}

/// Returns the ids of all registered transects, in corpus order.
pub fn all_transect_ids() -> Vec<&'static str> {
    TRANSECT_REGISTRY.iter().map(|t| t.id).collect()
}

/// Returns the transects belonging to one lithology, in corpus order.
pub fn transects_in(lithology: Lithology) -> Vec<&'static Transect> {
    TRANSECT_REGISTRY
        .iter()
        .filter(|t| t.lithology == lithology)
        .collect()
}

/// Looks up a transect by id. Returns `None` if not found.
pub fn find_transect(id: &str) -> Option<&'static Transect> {
    TRANSECT_REGISTRY.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_holds_ten_transects_per_lithology() {
        for lith in Lithology::ALL {
            assert_eq!(
                transects_in(lith).len(),
                10,
                "expected 10 transects for {}",
                lith
            );
        }
        assert_eq!(TRANSECT_REGISTRY.len(), 30);
    }

    #[test]
    fn test_no_duplicate_transect_ids() {
        let mut seen = std::collections::HashSet::new();
        for t in TRANSECT_REGISTRY {
            assert!(
                seen.insert(t.id),
                "duplicate transect id '{}' found in TRANSECT_REGISTRY",
                t.id
            );
        }
    }

    #[test]
    fn test_ids_match_lithology_prefix() {
        // DFC = carbonate, DFSSC = coarse sandstone, DFSSF = fine sandstone.
        // An id filed under the wrong unit would silently pool elevations
        // into the wrong group.
        for t in TRANSECT_REGISTRY {
            let expected = match t.lithology {
                Lithology::Carbonate => "DFC_",
                Lithology::CoarseSandstone => "DFSSC_",
                Lithology::FineSandstone => "DFSSF_",
            };
            assert!(
                t.id.starts_with(expected),
                "transect '{}' filed under {}",
                t.id,
                t.lithology
            );
        }
    }

    #[test]
    fn test_only_dfssf_1_overrides_left_reference() {
        for t in TRANSECT_REGISTRY {
            if t.id == "DFSSF_1" {
                assert_eq!(t.left_reference_index, 1);
            } else {
                assert_eq!(
                    t.left_reference_index, 0,
                    "unexpected left reference override on '{}'",
                    t.id
                );
            }
        }
    }

    #[test]
    fn test_find_transect_returns_correct_entry() {
        let t = find_transect("DFSSC_7").expect("DFSSC_7 should be registered");
        assert_eq!(t.lithology, Lithology::CoarseSandstone);
    }

    #[test]
    fn test_find_transect_returns_none_for_unknown_id() {
        assert!(find_transect("DFX_1").is_none());
    }

    #[test]
    fn test_csv_file_name_appends_extension() {
        assert_eq!(csv_file_name("DFC_1"), "DFC_1.csv");
    }

    #[test]
    fn test_registry_order_groups_lithologies_contiguously() {
        // The roughness table is indexed by corpus position; the lithology
        // blocks must stay contiguous for per-group column slices to hold.
        let liths: Vec<_> = TRANSECT_REGISTRY.iter().map(|t| t.lithology).collect();
        let mut changes = 0;
        for w in liths.windows(2) {
            if w[0] != w[1] {
                changes += 1;
            }
        }
        assert_eq!(changes, 2, "lithology blocks must be contiguous");
    }
}
