//! Gateway to the external name-resolution service.
//!
//! The service is a black box: a program (gnverifier by default) that
//! reads newline-delimited scientific names on stdin and writes a CSV
//! of candidate matches on stdout. A non-zero exit means the authority
//! is unavailable; that error is fatal to the run and is never retried
//! here.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::{AuthoritySource, MatchRow};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to start resolver `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("resolver I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("resolver exited with code {code:?}")]
    AuthorityUnavailable { code: Option<i32> },
    #[error("resolver output malformed: {0}")]
    Malformed(String),
}

/// Resolves a batch of scientific names to catalog matches.
pub trait NameResolver {
    fn resolve(&self, names: &[String]) -> Result<Vec<MatchRow>, ResolveError>;
}

/// Production resolver: spawns gnverifier restricted to the CoL and
/// GBIF data sources in best-match mode.
#[derive(Debug, Clone)]
pub struct GnVerifier {
    pub program: String,
}

impl Default for GnVerifier {
    fn default() -> Self {
        GnVerifier {
            program: "gnverifier".to_string(),
        }
    }
}

impl GnVerifier {
    pub fn new(program: impl Into<String>) -> Self {
        GnVerifier {
            program: program.into(),
        }
    }

    fn sources_arg() -> String {
        format!(
            "{},{}",
            AuthoritySource::Col.data_source_id(),
            AuthoritySource::Gbif.data_source_id()
        )
    }
}

impl NameResolver for GnVerifier {
    fn resolve(&self, names: &[String]) -> Result<Vec<MatchRow>, ResolveError> {
        let mut child = Command::new(&self.program)
            .arg("-s")
            .arg(Self::sources_arg())
            .arg("-M")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // Resolver diagnostics stream straight through to the
            // operator's terminal.
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ResolveError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(names.join("\n").as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ResolveError::AuthorityUnavailable {
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ResolveError::Malformed(format!("non-utf8 output: {e}")))?;
        parse_match_rows(&stdout)
    }
}

/// Parse the resolver's CSV response by header. Requires the
/// `ScientificName`, `DataSourceId`, `TaxonId` and `ClassificationPath`
/// columns; rows from unknown data sources are dropped.
pub fn parse_match_rows(text: &str) -> Result<Vec<MatchRow>, ResolveError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ResolveError::Malformed(e.to_string()))?
        .clone();
    let column = |name: &str| -> Result<usize, ResolveError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ResolveError::Malformed(format!("missing column {name}")))
    };
    let name_col = column("ScientificName")?;
    let source_col = column("DataSourceId")?;
    let id_col = column("TaxonId")?;
    let path_col = column("ClassificationPath")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ResolveError::Malformed(e.to_string()))?;
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();

        let source_id = cell(source_col);
        let Some(source) = AuthoritySource::from_data_source_id(&source_id) else {
            tracing::debug!(%source_id, "dropping match from unrequested data source");
            continue;
        };

        rows.push(MatchRow {
            scientific_name: cell(name_col),
            source,
            taxon_id: cell(id_col),
            classification_path: cell(path_col),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_by_header_position() {
        let text = "\
DataSourceId,ScientificName,TaxonId,ClassificationPath,MatchType
1,Bellis perennis,326386,Plantae|Tracheophyta|Magnoliopsida,Exact
11,Bellis perennis,3117424,Plantae|Tracheophyta|Magnoliopsida,Exact
";
        let rows = parse_match_rows(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, AuthoritySource::Col);
        assert_eq!(rows[0].taxon_id, "326386");
        assert_eq!(rows[1].source, AuthoritySource::Gbif);
        assert_eq!(rows[1].scientific_name, "Bellis perennis");
    }

    #[test]
    fn drops_rows_from_unrequested_sources() {
        let text = "\
ScientificName,DataSourceId,TaxonId,ClassificationPath
Bellis perennis,196,x,Plantae
Bellis perennis,1,326386,Plantae|Tracheophyta
";
        let rows = parse_match_rows(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source, AuthoritySource::Col);
    }

    #[test]
    fn missing_column_is_malformed() {
        let text = "ScientificName,TaxonId\nBellis perennis,1\n";
        let err = parse_match_rows(text).unwrap_err();
        assert!(matches!(err, ResolveError::Malformed(_)), "got {err:?}");
        assert!(err.to_string().contains("DataSourceId"));
    }

    #[test]
    fn empty_response_yields_no_rows() {
        assert!(parse_match_rows("").unwrap().is_empty());
        let header_only = "ScientificName,DataSourceId,TaxonId,ClassificationPath\n";
        assert!(parse_match_rows(header_only).unwrap().is_empty());
    }
}
