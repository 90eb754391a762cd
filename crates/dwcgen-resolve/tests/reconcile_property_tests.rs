//! Property tests for the reconciliation rules: enrichment is
//! idempotent and GBIF assignment is strictly rank-gated.

use proptest::prelude::*;

use dwcgen_model::{is_gbif_rank, Resource, Taxon};
use dwcgen_resolve::{reconcile, AuthoritySource, MatchRow};

fn rank_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("kingdom".to_string()),
        Just("phylum".to_string()),
        Just("class".to_string()),
        Just("order".to_string()),
        Just("family".to_string()),
        Just("genus".to_string()),
        Just("species".to_string()),
        Just("subspecies".to_string()),
        Just("variety".to_string()),
        Just("form".to_string()),
        Just("section".to_string()),
        Just("".to_string()),
    ]
}

fn taxa_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    // Unique name per taxon; duplicate-name conflation is covered by
    // its own unit test, not these properties.
    prop::collection::btree_map("[A-Z][a-z]{2,8} [a-z]{3,8}", rank_strategy(), 1..8)
        .prop_map(|m| m.into_iter().collect())
}

fn build_resource(taxa: &[(String, String)]) -> Resource {
    Resource {
        id: "r1".to_string(),
        work_id: "w1".to_string(),
        file: "r1-taxa".to_string(),
        taxa: taxa
            .iter()
            .enumerate()
            .map(|(i, (name, rank))| Taxon {
                scientific_name_id: format!("t{i}"),
                scientific_name: name.clone(),
                taxon_rank: rank.clone(),
                taxonomic_status: "accepted".to_string(),
                ..Taxon::default()
            })
            .collect(),
    }
}

fn build_rows(taxa: &[(String, String)], mask: &[bool]) -> Vec<MatchRow> {
    let mut rows = Vec::new();
    for ((name, _), &with_gbif) in taxa.iter().zip(mask) {
        rows.push(MatchRow {
            scientific_name: name.clone(),
            source: AuthoritySource::Col,
            taxon_id: format!("col-{name}"),
            classification_path: "Plantae|Tracheophyta|Magnoliopsida".to_string(),
        });
        if with_gbif {
            rows.push(MatchRow {
                scientific_name: name.clone(),
                source: AuthoritySource::Gbif,
                taxon_id: format!("gbif-{name}"),
                classification_path: "Plantae|Tracheophyta|Magnoliopsida".to_string(),
            });
        }
    }
    rows
}

proptest! {
    #[test]
    fn gbif_assignment_is_rank_gated(
        taxa in taxa_strategy(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut resource = build_resource(&taxa);
        let rows = build_rows(&taxa, &mask);

        reconcile(&mut resource, &rows);

        for (taxon, &with_gbif) in resource.taxa.iter().zip(&mask) {
            let expected = with_gbif && is_gbif_rank(&taxon.taxon_rank);
            prop_assert_eq!(
                taxon.gbif_taxon_id.is_some(),
                expected,
                "rank {} with row {}",
                taxon.taxon_rank,
                with_gbif
            );
            // CoL enrichment is not rank-gated.
            prop_assert!(taxon.col_taxon_id.is_some());
        }
    }

    #[test]
    fn second_pass_with_same_inputs_changes_nothing(
        taxa in taxa_strategy(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut resource = build_resource(&taxa);
        let rows = build_rows(&taxa, &mask);

        reconcile(&mut resource, &rows);
        let snapshot = resource.clone();
        let buckets = reconcile(&mut resource, &rows);

        prop_assert_eq!(resource, snapshot);
        prop_assert!(buckets.col.is_empty());
        prop_assert!(buckets.gbif.is_empty());
    }
}
