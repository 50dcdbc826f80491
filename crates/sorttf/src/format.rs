//! hand-off to an external canonical formatter
//!
//! Whitespace and indentation are not our business: [TerraformFmt] writes the text to a temporary
//! `*.tf` file, runs `terraform fmt` on it and reads the result back. The temporary file is
//! removed when it goes out of scope, on every return path.
//!
//! A missing formatter binary is reported as [FormatError::ToolNotFound] so callers can decide
//! to carry on with unformatted output.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Turns hcl text into its formatted form
pub trait Formatter {
    fn format(&self, text: &str) -> Result<String, FormatError>;
}

// blanket impl for Fn
impl<F> Formatter for F
where
    F: Fn(&str) -> Result<String, FormatError>,
{
    fn format(&self, text: &str) -> Result<String, FormatError> {
        self(text)
    }
}

/// Returns text unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Formatter for Identity {
    fn format(&self, text: &str) -> Result<String, FormatError> {
        Ok(text.to_owned())
    }
}

/// Runs `<program> fmt <file>`
#[derive(Debug, Clone)]
pub struct TerraformFmt {
    program: PathBuf,
    /// where the temporary `*.tf` file is created, the system default if unset
    temp_dir: Option<PathBuf>,
}

impl TerraformFmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            temp_dir: None,
        }
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for TerraformFmt {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl Formatter for TerraformFmt {
    #[tracing::instrument(level = "debug", skip_all, fields(program = %self.program.display()))]
    fn format(&self, text: &str) -> Result<String, FormatError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("sorttf-").suffix(".tf");
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(text.as_bytes())?;
        file.flush()?;

        let output = Command::new(&self.program)
            .arg("fmt")
            .arg(file.path())
            .output()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => FormatError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => FormatError::Spawn {
                    program: self.program.clone(),
                    source: err,
                },
            })?;

        if !output.status.success() {
            let mut message = String::from_utf8_lossy(&output.stderr).into_owned();
            message.push_str(&String::from_utf8_lossy(&output.stdout));
            tracing::debug!(status = %output.status, "formatter failed");

            return Err(FormatError::Rejected {
                status: output.status,
                output: message.trim().to_owned(),
            });
        }

        Ok(std::fs::read_to_string(file.path())?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("Formatter `{}` not found", .program.display())]
    ToolNotFound { program: PathBuf },
    #[error("Unable to run formatter `{}`", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Formatter rejected the input ({status}): {output}")]
    Rejected { status: ExitStatus, output: String },
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

impl FormatError {
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, FormatError::ToolNotFound { .. })
    }
}
