//! Checklist text parsing for dwcgen
//!
//! Turns one work unit's source text into resources. The pipeline
//! treats this as a replaceable collaborator; the format here is a
//! plain line-oriented one:
//!
//! ```text
//! == r1 r1-checklist
//! t1<TAB>species<TAB>accepted<TAB>Bellis perennis
//! t2<TAB>species<TAB>accepted<TAB>Bellis annua<TAB>genus=Bellis
//! ```
//!
//! A `== <resourceId> <outputFileStem>` line opens a resource block.
//! Each taxon line carries the four required terms in fixed positions
//! (`scientificNameID`, `taxonRank`, `taxonomicStatus`,
//! `scientificName`) followed by optional `term=value` pairs for any
//! other Darwin Core term. Blank lines and `#` comments are ignored.

use dwcgen_model::{Resource, Taxon};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed resource header, expected `== <id> <file>`")]
    BadHeader { line: usize },
    #[error("line {line}: taxon before the first resource header")]
    TaxonOutsideResource { line: usize },
    #[error("line {line}: taxon needs at least id, rank, status and name")]
    ShortTaxonLine { line: usize },
    #[error("line {line}: malformed extra field `{text}`, expected `term=value`")]
    BadExtra { line: usize, text: String },
    #[error("line {line}: unknown Darwin Core term `{term}`")]
    UnknownTerm { line: usize, term: String },
    #[error("work produced no resources")]
    Empty,
}

/// Parse one work unit's checklist text into its resources, in file
/// order.
pub fn parse_checklist(text: &str, work_id: &str) -> Result<Vec<Resource>, ParseError> {
    let mut resources: Vec<Resource> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix("==") {
            let mut parts = header.split_whitespace();
            let (Some(id), Some(file), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ParseError::BadHeader { line: line_no });
            };
            resources.push(Resource {
                id: id.to_string(),
                work_id: work_id.to_string(),
                file: file.to_string(),
                taxa: Vec::new(),
            });
            continue;
        }

        let Some(resource) = resources.last_mut() else {
            return Err(ParseError::TaxonOutsideResource { line: line_no });
        };
        resource.taxa.push(parse_taxon_line(line, line_no)?);
    }

    if resources.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(resources)
}

fn parse_taxon_line(line: &str, line_no: usize) -> Result<Taxon, ParseError> {
    let mut cells = line.split('\t');
    let (Some(id), Some(rank), Some(status), Some(name)) =
        (cells.next(), cells.next(), cells.next(), cells.next())
    else {
        return Err(ParseError::ShortTaxonLine { line: line_no });
    };

    let mut taxon = Taxon {
        scientific_name_id: id.trim().to_string(),
        taxon_rank: rank.trim().to_string(),
        taxonomic_status: status.trim().to_string(),
        scientific_name: name.trim().to_string(),
        ..Taxon::default()
    };

    for extra in cells {
        let extra = extra.trim();
        if extra.is_empty() {
            continue;
        }
        let Some((term, value)) = extra.split_once('=') else {
            return Err(ParseError::BadExtra {
                line: line_no,
                text: extra.to_string(),
            });
        };
        if !taxon.set_field(term.trim(), value.trim()) {
            return Err(ParseError::UnknownTerm {
                line: line_no,
                term: term.trim().to_string(),
            });
        }
    }

    Ok(taxon)
}
