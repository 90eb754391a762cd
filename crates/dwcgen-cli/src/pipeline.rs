//! Pipeline orchestrator.
//!
//! Walks the pending work units (input files not yet represented in
//! the output directory), and for each one runs parse → resolve →
//! reconcile → check → review until every resource of the unit is
//! accepted, then writes the unit's Darwin Core tables. A retry
//! decision anywhere in the unit restarts the unit from the parse
//! step; resolver failure aborts the whole run.

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use dwcgen_model::{write_dwc_csv, Resource};
use dwcgen_resolve::{check, reconcile, NameResolver};

use crate::ledger::OverrideLedger;
use crate::report::print_report;
use crate::review::{review_problems, ReviewOutcome};
use crate::session::PromptSession;

/// Parser collaborator seam: raw checklist text plus work ID to
/// parsed resources.
pub type ParseFn<'a> = dyn Fn(&str, &str) -> Result<Vec<Resource>> + 'a;

pub struct Pipeline<'a> {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ledger: OverrideLedger,
    pub resolver: &'a dyn NameResolver,
    pub parser: &'a ParseFn<'a>,
    pub session: &'a mut dyn PromptSession,
}

impl Pipeline<'_> {
    /// Process every pending work unit, in ascending numeric order of
    /// the work ID's numeric suffix.
    pub fn run(&mut self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;
        for work_id in self.pending_work_ids()? {
            self.process_work(&work_id)?;
        }
        Ok(())
    }

    fn pending_work_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.input_dir)
            .with_context(|| format!("reading {}", self.input_dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort_by_cached_key(|id| work_sort_key(id));

        let mut produced = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            if let Some(name) = entry?.file_name().to_str() {
                produced.push(name.to_string());
            }
        }

        // A work unit already represented in the output directory by
        // file-name prefix is done; never reprocess it.
        Ok(ids
            .into_iter()
            .filter(|id| !produced.iter().any(|file| file.starts_with(id.as_str())))
            .collect())
    }

    fn process_work(&mut self, work_id: &str) -> Result<()> {
        let mut pass = 0u32;
        'unit: loop {
            pass += 1;
            let resources = self.acquire_resources(work_id, pass)?;

            let mut accepted: Vec<Resource> = Vec::with_capacity(resources.len());
            for mut resource in resources {
                println!("{work_id}: matching {}", resource.id);
                let rows = self.resolver.resolve(&resource.scientific_names())?;
                let buckets = reconcile(&mut resource, &rows);

                // An operator sign-off from an earlier run bypasses
                // the gate outright.
                if self.ledger.contains(&resource.id)? {
                    accepted.push(resource);
                    continue;
                }

                let report = check(&resource, &buckets);
                if !report.is_correct() {
                    print_report(&report);
                    match review_problems(&mut *self.session, &self.ledger, work_id, &resource.id)?
                    {
                        ReviewOutcome::Accepted => {}
                        ReviewOutcome::Retry => continue 'unit,
                    }
                }
                accepted.push(resource);
            }

            // Every resource reached acceptance; only now does the
            // unit produce output.
            self.write_outputs(&accepted)?;
            tracing::debug!(work_id, pass, "work unit complete");
            return Ok(());
        }
    }

    /// Parse the work unit's input file, prompting the operator to
    /// retry for as long as parsing fails. Each attempt re-reads the
    /// file, so an edit between attempts takes effect.
    fn acquire_resources(&mut self, work_id: &str, pass: u32) -> Result<Vec<Resource>> {
        let path = self.input_dir.join(format!("{work_id}.txt"));
        if pass == 1 {
            println!("{work_id}: generating Darwin Core");
        } else {
            println!("{work_id}: generating Darwin Core (pass {pass})");
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            match (self.parser)(&text, work_id) {
                Ok(resources) => return Ok(resources),
                Err(e) => {
                    eprintln!("{} {e:#}", "error:".red().bold());
                    self.session.ask(&format!(
                        "{work_id}: generating Darwin Core failed (attempt {attempt}), retry? "
                    ))?;
                }
            }
        }
    }

    /// Write the unit's tables in parallel; the files are disjoint.
    fn write_outputs(&self, resources: &[Resource]) -> Result<()> {
        let output_dir = &self.output_dir;
        resources.par_iter().try_for_each(|resource| {
            let path = output_dir.join(format!("{}.csv", resource.file));
            let file = fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_dwc_csv(BufWriter::new(file), &resource.taxa)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        })
    }
}

/// Works sort by the numeric value after the leading character of
/// their ID (`b9` before `b10`); IDs without a numeric suffix sort
/// after, lexicographically.
fn work_sort_key(id: &str) -> (u8, u64, String) {
    match id.get(1..).and_then(|suffix| suffix.parse::<u64>().ok()) {
        Some(n) => (0, n, id.to_string()),
        None => (1, 0, id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_ids_sort_by_numeric_suffix() {
        let mut ids = vec![
            "b10".to_string(),
            "b2".to_string(),
            "annex".to_string(),
            "b1".to_string(),
        ];
        ids.sort_by_cached_key(|id| work_sort_key(id));
        assert_eq!(ids, ["b1", "b2", "b10", "annex"]);
    }

    #[test]
    fn produced_prefixes_mask_pending_work() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("txt");
        let output = dir.path().join("dwc");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&output).unwrap();

        fs::write(input.join("b1.txt"), "").unwrap();
        fs::write(input.join("b2.txt"), "").unwrap();
        fs::write(input.join("notes.md"), "").unwrap();
        fs::write(output.join("b2-checklist.csv"), "").unwrap();

        struct NoResolver;
        impl NameResolver for NoResolver {
            fn resolve(
                &self,
                _names: &[String],
            ) -> std::result::Result<Vec<dwcgen_resolve::MatchRow>, dwcgen_resolve::ResolveError>
            {
                unreachable!("pending_work_ids never resolves")
            }
        }
        struct NoSession;
        impl PromptSession for NoSession {
            fn ask(&mut self, question: &str) -> Result<String> {
                unreachable!("unexpected prompt: {question}")
            }
        }

        let parser: &ParseFn = &|_, _| unreachable!("pending_work_ids never parses");
        let mut session = NoSession;
        let pipeline = Pipeline {
            input_dir: input,
            output_dir: output,
            ledger: OverrideLedger::new(dir.path().join("problems.csv")),
            resolver: &NoResolver,
            parser,
            session: &mut session,
        };

        assert_eq!(pipeline.pending_work_ids().unwrap(), vec!["b1".to_string()]);
    }
}
