//! console output

use crate::cli::Cli;
use colored::Colorize;
use sorttf::pipeline::{self, ErrorKind};
use std::path::{Path, PathBuf};

#[derive(Default, Debug)]
pub struct Summary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.changed + self.unchanged + self.failed
    }

    pub fn exit_code(&self, cli: &Cli) -> i32 {
        if self.failed > 0 || (cli.validate && self.changed > 0) {
            return 1;
        }
        0
    }
}

pub fn no_files() {
    println!("{}", "No Terraform or Terragrunt files found.".blue().bold());
}

pub fn found(files: &[PathBuf]) {
    println!("{}", format!("Found {} files:", files.len()).blue().bold());
    for file in files {
        println!("   {}", file.display().to_string().cyan());
    }
}

pub fn unchanged(path: &Path) {
    println!(
        "{} {}",
        "No changes needed:".green().bold(),
        path.display().to_string().cyan()
    );
}

pub fn would_update(path: &Path) {
    println!(
        "{} {}",
        "Would update:".yellow().bold(),
        path.display().to_string().cyan()
    );
}

pub fn needs_update(path: &Path) {
    println!(
        "{} {}",
        "Needs update:".yellow().bold(),
        path.display().to_string().cyan()
    );
}

pub fn updated(path: &Path) {
    println!(
        "{} {}",
        "Updated:".green().bold(),
        path.display().to_string().cyan()
    );
}

/// Prints a unified diff between the file on disk and its canonical form
pub fn diff(path: &Path, original: &str, canonical: &str) {
    let name = path.display().to_string();
    let old_header = format!("{name} (original)");
    let new_header = format!("{name} (sorted)");

    let text_diff = similar::TextDiff::from_lines(original, canonical);
    let unified = text_diff
        .unified_diff()
        .context_radius(3)
        .header(&old_header, &new_header)
        .to_string();

    for line in unified.lines() {
        let line = if line.starts_with("---") || line.starts_with("+++") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        println!("{line}");
    }
}

/// Per-file failure, the run continues
pub fn error(e: &anyhow::Error) {
    eprintln!("{} {e:#}", "Error:".red().bold());

    let kind = e.downcast_ref::<pipeline::Error>().map(pipeline::Error::kind);
    match kind {
        Some(ErrorKind::ToolNotFound) => eprintln!(
            "   {}",
            "Install terraform, point --formatter at it, or run with --no-format".yellow()
        ),
        Some(ErrorKind::Internal) => eprintln!(
            "   {}",
            "This is a bug in sorttf, the file was left untouched. Please report it.".yellow()
        ),
        _ => {}
    }
}

/// The run could not start
pub fn fatal(e: &anyhow::Error) {
    let mut chain = e.chain();
    if let Some(first) = chain.next() {
        eprintln!("{} {first}", "Error:".red().bold());
    }
    for cause in chain {
        eprintln!("   {cause}");
    }
}

pub fn summary(summary: &Summary, cli: &Cli) {
    let total = summary.total();
    let clean = summary.changed == 0 && summary.failed == 0;

    let line = if cli.dry_run && clean {
        format!("Processed {total} files, no changes needed").green()
    } else if cli.dry_run {
        format!("Processed {total} files, {} would be updated", summary.changed).blue()
    } else if cli.validate && clean {
        format!("Processed {total} files, all sorted").green()
    } else if cli.validate {
        format!("Processed {total} files, {} need updates", summary.changed).yellow()
    } else {
        format!("Processed {total} files, {} updated", summary.changed).green()
    };
    println!("{}", line.bold());

    if summary.failed > 0 {
        eprintln!("{}", format!("Encountered {} errors", summary.failed).red().bold());
    }
}
