//! Merging authority matches back into a resource.

use std::collections::HashMap;

use dwcgen_model::{is_gbif_rank, Resource, Taxon};

use crate::{AuthoritySource, ClassificationBuckets, MatchRow};

/// Merge match rows into the resource's taxa and record the
/// classification path of every match actually applied.
///
/// Precedence rules:
/// - a CoL row fills `colTaxonID` when it is still absent;
/// - a GBIF row fills `gbifTaxonID` when it is still absent and the
///   taxon's rank is in the recognized GBIF set;
/// - every other row is ignored.
///
/// Unmatched taxa keep absent identifiers; the consistency check
/// surfaces them later. Assignment is idempotent: an identifier, once
/// set, is never overwritten.
///
/// The working index is keyed by exact scientific-name string, so two
/// taxa sharing a name within one resource conflate: both end up with
/// the enriched copy of the later record. Known open issue, kept as-is.
pub fn reconcile(resource: &mut Resource, rows: &[MatchRow]) -> ClassificationBuckets {
    let mut by_name: HashMap<String, Taxon> = resource
        .taxa
        .iter()
        .map(|taxon| (taxon.scientific_name.clone(), taxon.clone()))
        .collect();

    let mut buckets = ClassificationBuckets::default();

    for row in rows {
        let Some(taxon) = by_name.get_mut(&row.scientific_name) else {
            tracing::warn!(
                resource = %resource.id,
                name = %row.scientific_name,
                "match for a name not present in the resource"
            );
            continue;
        };

        let slot = match row.source {
            AuthoritySource::Col => &mut taxon.col_taxon_id,
            AuthoritySource::Gbif => {
                if !is_gbif_rank(&taxon.taxon_rank) {
                    continue;
                }
                &mut taxon.gbif_taxon_id
            }
        };
        if slot.is_some() {
            continue;
        }
        *slot = Some(row.taxon_id.clone());
        buckets
            .bucket_mut(row.source)
            .push(row.classification_path.clone());
    }

    for taxon in &mut resource.taxa {
        if let Some(merged) = by_name.get(&taxon.scientific_name) {
            *taxon = merged.clone();
        }
    }

    buckets
}
