//! The per-name Darwin Core record.

use serde::{Deserialize, Serialize};

use crate::DWC_FIELDS;

/// A single name record. `col_taxon_id` and `gbif_taxon_id` start
/// absent and are filled at most once during reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Taxon {
    #[serde(rename = "scientificNameID")]
    pub scientific_name_id: String,
    pub scientific_name: String,
    pub scientific_name_authorship: Option<String>,
    pub generic_name: Option<String>,
    pub intrageneric_epithet: Option<String>,
    pub specific_epithet: Option<String>,
    pub intraspecific_epithet: Option<String>,
    pub taxon_rank: String,
    pub taxon_remarks: Option<String>,
    pub collection_code: Option<String>,
    pub taxonomic_status: String,
    #[serde(rename = "acceptedNameUsageID")]
    pub accepted_name_usage_id: Option<String>,
    pub accepted_name_usage: Option<String>,
    #[serde(rename = "parentNameUsageID")]
    pub parent_name_usage_id: Option<String>,
    pub parent_name_usage: Option<String>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub subfamily: Option<String>,
    pub genus: Option<String>,
    pub subgenus: Option<String>,
    pub higher_classification: Option<String>,
    #[serde(rename = "colTaxonID")]
    pub col_taxon_id: Option<String>,
    #[serde(rename = "gbifTaxonID")]
    pub gbif_taxon_id: Option<String>,
}

impl Taxon {
    /// Value of a Darwin Core term, empty string when absent.
    pub fn field(&self, term: &str) -> &str {
        fn opt(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("")
        }

        match term {
            "scientificNameID" => &self.scientific_name_id,
            "scientificName" => &self.scientific_name,
            "scientificNameAuthorship" => opt(&self.scientific_name_authorship),
            "genericName" => opt(&self.generic_name),
            "intragenericEpithet" => opt(&self.intrageneric_epithet),
            "specificEpithet" => opt(&self.specific_epithet),
            "intraspecificEpithet" => opt(&self.intraspecific_epithet),
            "taxonRank" => &self.taxon_rank,
            "taxonRemarks" => opt(&self.taxon_remarks),
            "collectionCode" => opt(&self.collection_code),
            "taxonomicStatus" => &self.taxonomic_status,
            "acceptedNameUsageID" => opt(&self.accepted_name_usage_id),
            "acceptedNameUsage" => opt(&self.accepted_name_usage),
            "parentNameUsageID" => opt(&self.parent_name_usage_id),
            "parentNameUsage" => opt(&self.parent_name_usage),
            "kingdom" => opt(&self.kingdom),
            "phylum" => opt(&self.phylum),
            "class" => opt(&self.class),
            "order" => opt(&self.order),
            "family" => opt(&self.family),
            "subfamily" => opt(&self.subfamily),
            "genus" => opt(&self.genus),
            "subgenus" => opt(&self.subgenus),
            "higherClassification" => opt(&self.higher_classification),
            "colTaxonID" => opt(&self.col_taxon_id),
            "gbifTaxonID" => opt(&self.gbif_taxon_id),
            _ => "",
        }
    }

    /// Set a Darwin Core term by name. Returns false for a term
    /// outside the fixed field list.
    pub fn set_field(&mut self, term: &str, value: &str) -> bool {
        let owned = value.to_string();
        match term {
            "scientificNameID" => self.scientific_name_id = owned,
            "scientificName" => self.scientific_name = owned,
            "scientificNameAuthorship" => self.scientific_name_authorship = Some(owned),
            "genericName" => self.generic_name = Some(owned),
            "intragenericEpithet" => self.intrageneric_epithet = Some(owned),
            "specificEpithet" => self.specific_epithet = Some(owned),
            "intraspecificEpithet" => self.intraspecific_epithet = Some(owned),
            "taxonRank" => self.taxon_rank = owned,
            "taxonRemarks" => self.taxon_remarks = Some(owned),
            "collectionCode" => self.collection_code = Some(owned),
            "taxonomicStatus" => self.taxonomic_status = owned,
            "acceptedNameUsageID" => self.accepted_name_usage_id = Some(owned),
            "acceptedNameUsage" => self.accepted_name_usage = Some(owned),
            "parentNameUsageID" => self.parent_name_usage_id = Some(owned),
            "parentNameUsage" => self.parent_name_usage = Some(owned),
            "kingdom" => self.kingdom = Some(owned),
            "phylum" => self.phylum = Some(owned),
            "class" => self.class = Some(owned),
            "order" => self.order = Some(owned),
            "family" => self.family = Some(owned),
            "subfamily" => self.subfamily = Some(owned),
            "subgenus" => self.subgenus = Some(owned),
            "genus" => self.genus = Some(owned),
            "higherClassification" => self.higher_classification = Some(owned),
            "colTaxonID" => self.col_taxon_id = Some(owned),
            "gbifTaxonID" => self.gbif_taxon_id = Some(owned),
            _ => return false,
        }
        true
    }

    /// The full output row, in `DWC_FIELDS` order.
    pub fn dwc_row(&self) -> Vec<String> {
        DWC_FIELDS.iter().map(|f| self.field(f).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_and_set_field_cover_every_term() {
        let mut taxon = Taxon::default();
        for (i, term) in DWC_FIELDS.iter().enumerate() {
            let value = format!("v{i}");
            assert!(taxon.set_field(term, &value), "set_field rejected {term}");
            assert_eq!(taxon.field(term), value, "field mismatch for {term}");
        }
    }

    #[test]
    fn unknown_terms_are_rejected() {
        let mut taxon = Taxon::default();
        assert!(!taxon.set_field("vernacularName", "x"));
        assert_eq!(taxon.field("vernacularName"), "");
    }

    #[test]
    fn serializes_with_darwin_core_term_names() {
        let mut taxon = Taxon::default();
        taxon.scientific_name_id = "t1".to_string();
        taxon.col_taxon_id = Some("326386".to_string());
        let json = serde_json::to_value(&taxon).unwrap();
        assert_eq!(json["scientificNameID"], "t1");
        assert_eq!(json["colTaxonID"], "326386");
        assert_eq!(json["higherClassification"], serde_json::Value::Null);
    }
}
