//! dwcgen: checklist text → Darwin Core CSV
//!
//! Enriches parsed taxa with Catalogue of Life and GBIF Backbone
//! identifiers via an external name-resolution service, and gates
//! every output file behind a consistency check with an interactive
//! operator review and a persistent override ledger.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use dwcgen_cli::ledger::OverrideLedger;
use dwcgen_cli::pipeline::{ParseFn, Pipeline};
use dwcgen_cli::report::print_report;
use dwcgen_cli::session::RustylineSession;
use dwcgen_ingest_txt::parse_checklist;
use dwcgen_resolve::{check, reconcile, GnVerifier, NameResolver};

#[derive(Parser)]
#[command(name = "dwcgen")]
#[command(
    author,
    version,
    about = "Generate Darwin Core checklists enriched with CoL and GBIF identifiers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process pending work units: parse, match, review, write CSVs.
    Run {
        /// Directory of `<workId>.txt` checklist inputs
        #[arg(long, default_value = "txt")]
        input: PathBuf,
        /// Directory the Darwin Core CSVs are written to
        #[arg(long, default_value = "dwc")]
        output: PathBuf,
        /// Override ledger recording operator sign-offs
        #[arg(long, default_value = "problems.csv")]
        ledger: PathBuf,
        /// Name-resolution program to invoke
        #[arg(long, default_value = "gnverifier")]
        resolver: String,
    },
    /// Match and check one checklist file without prompts or output.
    Check {
        /// Checklist input file
        input: PathBuf,
        /// Name-resolution program to invoke
        #[arg(long, default_value = "gnverifier")]
        resolver: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            input,
            output,
            ledger,
            resolver,
        } => {
            let resolver = GnVerifier::new(resolver);
            let mut session = RustylineSession::new()?;
            let parser: &ParseFn = &|text, work_id| Ok(parse_checklist(text, work_id)?);
            let mut pipeline = Pipeline {
                input_dir: input,
                output_dir: output,
                ledger: OverrideLedger::new(ledger),
                resolver: &resolver,
                parser,
                session: &mut session,
            };
            pipeline.run()
        }
        Commands::Check { input, resolver } => cmd_check(&input, &GnVerifier::new(resolver)),
    }
}

fn cmd_check(input: &Path, resolver: &dyn NameResolver) -> Result<()> {
    let work_id = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("work")
        .to_string();
    let text = fs::read_to_string(input)?;
    let resources = parse_checklist(&text, &work_id)?;

    let mut problems = 0usize;
    for mut resource in resources {
        println!("{work_id}: matching {}", resource.id);
        let rows = resolver.resolve(&resource.scientific_names())?;
        let buckets = reconcile(&mut resource, &rows);
        let report = check(&resource, &buckets);
        if report.is_correct() {
            println!("{} {}", "ok".green().bold(), resource.id);
        } else {
            problems += 1;
            print_report(&report);
        }
    }

    if problems > 0 {
        return Err(anyhow!("{problems} resource(s) with problems"));
    }
    Ok(())
}
