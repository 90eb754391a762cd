//! Rendering of check findings for the operator.

use colored::Colorize;
use dwcgen_model::{Taxon, DISPLAY_FIELDS};
use dwcgen_resolve::CheckReport;

/// Print the findings of one resource's consistency check: flagged
/// taxa as an aligned table over the display fields, then one line per
/// short classification prefix.
pub fn print_report(report: &CheckReport) {
    if !report.missing.is_empty() {
        println!("{}", render_missing_table(&report.missing));
    }
    for finding in &report.short_prefixes {
        println!(
            "{} {}: short prefix {:?} ({} taxa)",
            "problem".yellow().bold(),
            finding.source.label(),
            finding.prefix,
            finding.segments
        );
    }
}

fn render_missing_table(taxa: &[Taxon]) -> String {
    let mut widths: Vec<usize> = DISPLAY_FIELDS.iter().map(|f| f.len()).collect();
    for taxon in taxa {
        for (i, field) in DISPLAY_FIELDS.iter().enumerate() {
            widths[i] = widths[i].max(taxon.field(field).chars().count());
        }
    }

    let mut out = String::new();
    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    out.push_str(&render_row(DISPLAY_FIELDS.to_vec()));
    for taxon in taxa {
        out.push('\n');
        out.push_str(&render_row(
            DISPLAY_FIELDS.iter().map(|f| taxon.field(f)).collect(),
        ));
    }
    out
}
