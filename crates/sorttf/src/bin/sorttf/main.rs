mod cli;
mod report;

use anyhow::Context;
use rayon::prelude::*;
use sorttf::format::{Identity, TerraformFmt};
use sorttf::pipeline::{Outcome, Pipeline};
use std::path::{Path, PathBuf};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SORTTF_LOG"))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(summary) => std::process::exit(summary.exit_code(&cli)),
        Err(e) => {
            report::fatal(&e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &cli::Cli) -> anyhow::Result<report::Summary> {
    let files = sorttf::files::discover(&cli.path, cli.recursive)?;
    let mut summary = report::Summary::default();

    if files.is_empty() {
        report::no_files();
        return Ok(summary);
    }

    if cli.verbose {
        report::found(&files);
    }

    let pipeline = pipeline(&cli.formatter);
    let write = !cli.read_only();

    let results: Vec<(PathBuf, anyhow::Result<FileOutcome>)> = files
        .into_par_iter()
        .map(|path| {
            let result = process_file(&path, &pipeline, write);
            (path, result)
        })
        .collect();

    for (path, result) in results {
        match result {
            Ok(FileOutcome::Unchanged) => {
                summary.unchanged += 1;
                if cli.verbose {
                    report::unchanged(&path);
                }
            }
            Ok(FileOutcome::Changed {
                original,
                canonical,
            }) => {
                summary.changed += 1;
                if cli.validate {
                    report::needs_update(&path);
                    report::diff(&path, &original, &canonical);
                } else if cli.dry_run {
                    report::would_update(&path);
                    report::diff(&path, &original, &canonical);
                } else {
                    report::updated(&path);
                }
            }
            Err(e) => {
                summary.failed += 1;
                report::error(&e);
            }
        }
    }

    report::summary(&summary, cli);
    Ok(summary)
}

fn pipeline(args: &cli::FormatterArgs) -> Pipeline {
    if args.skip {
        return Pipeline::new(Identity);
    }

    Pipeline::new(TerraformFmt::new(args.program.clone())).allow_unformatted(args.allow_missing)
}

enum FileOutcome {
    Unchanged,
    Changed { original: String, canonical: String },
}

/// read -> canonicalize -> compare -> (maybe) write
fn process_file(path: &Path, pipeline: &Pipeline, write: bool) -> anyhow::Result<FileOutcome> {
    tracing::info!(path=%path.display(), "processing file");

    let original = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read {}", path.display()))?;

    let canonical = match pipeline
        .process(&original)
        .with_context(|| format!("Unable to sort {}", path.display()))?
    {
        Outcome::Unchanged => return Ok(FileOutcome::Unchanged),
        Outcome::Changed { canonical } => canonical,
    };

    if write {
        sorttf::files::write_atomic(path, &canonical)
            .with_context(|| format!("Unable to replace {}", path.display()))?;
    }

    Ok(FileOutcome::Changed {
        original,
        canonical,
    })
}
