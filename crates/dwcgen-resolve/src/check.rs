//! Consistency checks over a reconciled resource.
//!
//! Pure evaluation: findings are data for the review loop, never
//! errors.

use dwcgen_model::{is_gbif_rank, Resource, Taxon};

use crate::{AuthoritySource, ClassificationBuckets};

/// A shared classification prefix must cover at least this many
/// ancestor segments, or its bucket is flagged.
pub const MIN_PREFIX_SEGMENTS: usize = 3;

/// A classification bucket whose shared prefix is too short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFinding {
    pub source: AuthoritySource,
    pub prefix: String,
    pub segments: usize,
}

/// Verdict of the consistency check, with the taxa and buckets that
/// were flagged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    /// Accepted taxa still missing a required identifier.
    pub missing: Vec<Taxon>,
    pub short_prefixes: Vec<PrefixFinding>,
}

impl CheckReport {
    pub fn is_correct(&self) -> bool {
        self.missing.is_empty() && self.short_prefixes.is_empty()
    }
}

/// Evaluate a reconciled resource.
///
/// Completeness: every accepted taxon with a recognized GBIF rank must
/// carry a `gbifTaxonID`. The matching CoL completeness arm is
/// deliberately disabled; CoL absence is never flagged.
///
/// Structure: per bucket, the classification paths must share a prefix
/// of at least [`MIN_PREFIX_SEGMENTS`] ancestors.
pub fn check(resource: &Resource, buckets: &ClassificationBuckets) -> CheckReport {
    let mut report = CheckReport::default();

    for taxon in &resource.taxa {
        if taxon.taxonomic_status != "accepted" {
            continue;
        }

        let missing_col = false; // CoL completeness relaxed for now
        let missing_gbif = is_gbif_rank(&taxon.taxon_rank) && taxon.gbif_taxon_id.is_none();

        if missing_col || missing_gbif {
            report.missing.push(taxon.clone());
        }
    }

    for (source, paths) in buckets.iter() {
        let prefix = shared_path_prefix(paths);
        let segments = prefix.split('|').count();
        if segments < MIN_PREFIX_SEGMENTS {
            report.short_prefixes.push(PrefixFinding {
                source,
                prefix,
                segments,
            });
        }
    }

    report
}

/// Longest prefix of the first path that every other path starts with,
/// backed off to a `|` boundary of the first path. Fewer than two
/// paths share nothing, giving the empty prefix (which splits to a
/// single empty segment and therefore always flags).
fn shared_path_prefix(paths: &[String]) -> String {
    if paths.len() < 2 {
        return String::new();
    }

    let first = paths[0].as_bytes();
    let mut common = first.len();
    for path in &paths[1..] {
        common = common.min(
            first
                .iter()
                .zip(path.as_bytes())
                .take_while(|(a, b)| a == b)
                .count(),
        );
    }

    if common == first.len() {
        return paths[0].clone();
    }
    for end in (1..=common).rev() {
        if first[end] == b'|' {
            return paths[0][..end].to_string();
        }
    }
    String::new()
}
