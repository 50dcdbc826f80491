//! parse, validate, canonicalize, verify and format one document
use crate::canonical::canonicalize;
use crate::document::{Document, ParseError};
use crate::fingerprint::fingerprint;
use crate::format::{FormatError, Formatter};
use crate::validate::{validate, StructuralErrors};

/// Result of running a document through the [Pipeline]
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// canonical text equals the input byte for byte
    Unchanged,
    Changed { canonical: String },
}

pub struct Pipeline {
    formatter: Box<dyn Formatter + Send + Sync>,
    allow_unformatted: bool,
}

impl Pipeline {
    pub fn new(formatter: impl Formatter + Send + Sync + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            allow_unformatted: false,
        }
    }

    /// Continue with unformatted canonical text when the formatter binary is missing
    pub fn allow_unformatted(mut self, yes: bool) -> Self {
        self.allow_unformatted = yes;
        self
    }

    /// Produces the canonical, formatted text for `source`
    pub fn canonical_text(&self, source: &str) -> Result<String, Error> {
        let document = Document::parse(source)?;
        let expected = fingerprint(&document);

        let validated = validate(document)?;
        let text = canonicalize(validated).into_string();

        let reparsed = Document::parse(&text).map_err(Error::Unparsable)?;
        if fingerprint(&reparsed) != expected {
            return Err(Error::NotPreserved);
        }

        match self.formatter.format(&text) {
            Ok(formatted) => Ok(formatted),
            Err(err) if err.is_tool_not_found() && self.allow_unformatted => {
                tracing::warn!(error = %err, "continuing without formatting");
                Ok(text)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn process(&self, source: &str) -> Result<Outcome, Error> {
        let canonical = self.canonical_text(source)?;

        if canonical.trim().is_empty() && !source.trim().is_empty() {
            return Err(Error::EmptyOutput);
        }

        if canonical == source {
            return Ok(Outcome::Unchanged);
        }

        Ok(Outcome::Changed { canonical })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("allow_unformatted", &self.allow_unformatted)
            .finish_non_exhaustive()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to parse document")]
    Parse(#[from] ParseError),
    #[error("Structural validation failed")]
    Structure(#[from] StructuralErrors),
    #[error("Canonical output could not be parsed back")]
    Unparsable(#[source] ParseError),
    #[error("Canonical output does not match the input's blocks and attributes")]
    NotPreserved,
    #[error("Formatting failed")]
    Format(#[from] FormatError),
    #[error("Canonical output is empty")]
    EmptyOutput,
}

/// Coarse classification of an [Error]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Structure,
    ToolNotFound,
    /// the formatter exited with an error on the canonical text
    FormatRejected,
    /// the formatter could not be run or its temp file used
    Io,
    /// canonicalization itself produced bad output
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::Structure(_) => ErrorKind::Structure,
            Error::Format(FormatError::ToolNotFound { .. }) => ErrorKind::ToolNotFound,
            Error::Format(FormatError::Rejected { .. }) => ErrorKind::FormatRejected,
            Error::Format(FormatError::Spawn { .. } | FormatError::IoError(_)) => ErrorKind::Io,
            Error::Unparsable(_) | Error::NotPreserved | Error::EmptyOutput => {
                ErrorKind::Internal
            }
        }
    }
}
