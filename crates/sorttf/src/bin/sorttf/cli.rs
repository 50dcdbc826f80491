//! sorttf cli interface

use clap::Parser;
use std::path::PathBuf;

/// Sort and format Terraform (.tf) and Terragrunt (.hcl) files
///
/// Blocks are ordered by type (terraform, provider, variable, locals, data,
/// resource, module, output) and labels; attributes alphabetically with
/// `for_each` first. `terraform fmt` takes care of whitespace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// File or directory to process
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Scan directories recursively
    #[clap(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Show what would be changed without writing (shows a unified diff)
    #[clap(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with a non-zero code if any files are not sorted/formatted
    ///
    /// Nothing is written.
    #[clap(long = "validate", conflicts_with("dry_run"))]
    pub validate: bool,

    /// Print which files were found and which needed no changes
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[clap(flatten)]
    pub formatter: FormatterArgs,
}

#[derive(Parser, Debug)]
pub struct FormatterArgs {
    /// Formatter executable, invoked as `<PROGRAM> fmt <file>`
    #[clap(long = "formatter", value_name = "PROGRAM", default_value = "terraform")]
    pub program: PathBuf,

    /// Do not run the formatter, only reorder
    #[clap(long = "no-format", conflicts_with("allow_missing"))]
    pub skip: bool,

    /// Keep going with unformatted output when the formatter is not installed
    #[clap(long = "allow-missing-formatter")]
    pub allow_missing: bool,
}

impl Cli {
    /// Files are left untouched
    pub fn read_only(&self) -> bool {
        self.dry_run || self.validate
    }
}
