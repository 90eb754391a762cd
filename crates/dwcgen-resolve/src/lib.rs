//! Name reconciliation against external taxon catalogs
//!
//! The enrichment core of dwcgen:
//! - [`gateway`]: runs the external name-resolution service and parses
//!   its tabular response into [`MatchRow`]s.
//! - [`reconcile`]: merges match rows into a `Resource` under
//!   source-precedence and rank rules.
//! - [`check`]: evaluates completeness of assigned identifiers and
//!   structural agreement of the accepted classification paths.

pub mod check;
pub mod gateway;
pub mod reconcile;

pub use check::{check, CheckReport, PrefixFinding};
pub use gateway::{GnVerifier, NameResolver, ResolveError};
pub use reconcile::reconcile;

/// The two catalogs dwcgen enriches against, identified on the wire by
/// their gnverifier data-source IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthoritySource {
    /// Catalogue of Life (data source 1).
    Col,
    /// GBIF Backbone Taxonomy (data source 11).
    Gbif,
}

impl AuthoritySource {
    pub fn from_data_source_id(id: &str) -> Option<Self> {
        match id {
            "1" => Some(AuthoritySource::Col),
            "11" => Some(AuthoritySource::Gbif),
            _ => None,
        }
    }

    pub fn data_source_id(&self) -> &'static str {
        match self {
            AuthoritySource::Col => "1",
            AuthoritySource::Gbif => "11",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthoritySource::Col => "CoL",
            AuthoritySource::Gbif => "GBIF",
        }
    }
}

/// One candidate match returned by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub scientific_name: String,
    pub source: AuthoritySource,
    pub taxon_id: String,
    /// Ordered ancestor lineage, pipe-delimited.
    pub classification_path: String,
}

/// Per-source classification paths accepted during reconciliation.
/// Input to the structural consistency check, nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationBuckets {
    pub col: Vec<String>,
    pub gbif: Vec<String>,
}

impl ClassificationBuckets {
    pub fn bucket_mut(&mut self, source: AuthoritySource) -> &mut Vec<String> {
        match source {
            AuthoritySource::Col => &mut self.col,
            AuthoritySource::Gbif => &mut self.gbif,
        }
    }

    pub fn iter(&self) -> [(AuthoritySource, &[String]); 2] {
        [
            (AuthoritySource::Col, self.col.as_slice()),
            (AuthoritySource::Gbif, self.gbif.as_slice()),
        ]
    }
}
