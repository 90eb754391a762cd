//! Darwin Core data model for dwcgen
//!
//! Defines the fixed Darwin Core field list, the per-name `Taxon`
//! record, the per-output-file `Resource` grouping, and CSV table
//! emission. Enrichment and checking live in `dwcgen-resolve`; this
//! crate is plain data.

use serde::{Deserialize, Serialize};
use std::io::Write;

mod taxon;

pub use taxon::Taxon;

/// The fixed Darwin Core field list, in output-column order.
pub const DWC_FIELDS: [&str; 26] = [
    "scientificNameID",
    "scientificName",
    "scientificNameAuthorship",
    "genericName",
    "intragenericEpithet",
    "specificEpithet",
    "intraspecificEpithet",
    "taxonRank",
    "taxonRemarks",
    "collectionCode",
    "taxonomicStatus",
    "acceptedNameUsageID",
    "acceptedNameUsage",
    "parentNameUsageID",
    "parentNameUsage",
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "subfamily",
    "genus",
    "subgenus",
    "higherClassification",
    "colTaxonID",
    "gbifTaxonID",
];

/// Subset of fields shown when flagged taxa are reported to the
/// operator.
pub const DISPLAY_FIELDS: [&str; 7] = [
    "scientificNameID",
    "taxonRank",
    "scientificName",
    "taxonomicStatus",
    "taxonRemarks",
    "colTaxonID",
    "gbifTaxonID",
];

/// Ranks eligible for GBIF Backbone enrichment.
pub const GBIF_RANKS: [&str; 9] = [
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "species",
    "subspecies",
    "variety",
];

/// Whether a rank is in the recognized GBIF enrichment set.
pub fn is_gbif_rank(rank: &str) -> bool {
    GBIF_RANKS.contains(&rank)
}

/// One output file's worth of taxa, in input order. The taxon ID of
/// each record is its `scientificNameID`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier, stable across reprocessing.
    pub id: String,
    /// Identifier of the work this resource was parsed from.
    pub work_id: String,
    /// Output file stem (written as `<file>.csv`).
    pub file: String,
    pub taxa: Vec<Taxon>,
}

impl Resource {
    pub fn scientific_names(&self) -> Vec<String> {
        self.taxa.iter().map(|t| t.scientific_name.clone()).collect()
    }
}

/// Write the Darwin Core table for a set of taxa: fixed header, one
/// row per taxon, empty string for absent fields.
pub fn write_dwc_csv<W: Write>(writer: W, taxa: &[Taxon]) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(DWC_FIELDS)?;
    for taxon in taxa {
        out.write_record(taxon.dwc_row())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(id: &str, name: &str) -> Taxon {
        Taxon {
            scientific_name_id: id.to_string(),
            scientific_name: name.to_string(),
            taxon_rank: "species".to_string(),
            taxonomic_status: "accepted".to_string(),
            ..Taxon::default()
        }
    }

    #[test]
    fn recognized_ranks_gate_gbif_enrichment() {
        assert!(is_gbif_rank("species"));
        assert!(is_gbif_rank("variety"));
        assert!(!is_gbif_rank("form"));
        assert!(!is_gbif_rank(""));
    }

    #[test]
    fn dwc_csv_emits_fixed_header_and_empty_fields() {
        let mut taxon = species("t1", "Genus species");
        taxon.gbif_taxon_id = Some("2435099".to_string());

        let mut buf = Vec::new();
        write_dwc_csv(&mut buf, &[taxon]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert_eq!(header, DWC_FIELDS.join(","));

        let row = lines.next().unwrap();
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), DWC_FIELDS.len());
        assert_eq!(cells[0], "t1");
        assert_eq!(cells[1], "Genus species");
        // Absent fields come out as empty strings, not omissions.
        assert_eq!(cells[2], "");
        assert_eq!(cells[24], "");
        assert_eq!(cells[25], "2435099");
    }

    #[test]
    fn display_fields_are_a_subset_of_the_schema() {
        for field in DISPLAY_FIELDS {
            assert!(DWC_FIELDS.contains(&field), "unknown field {field}");
        }
    }
}
