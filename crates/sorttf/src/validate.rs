//! structural checks that must pass before a document is reordered
//!
//! Checked rules:
//! - `resource`, `data`: exactly 2 labels
//! - `provider`, `variable`, `output`, `module`: exactly 1 label
//! - `locals`, `terraform`: no labels
//! - `backend`: exactly 1 label, and only directly inside a root `terraform` block
//!
//! Label counts are enforced for root blocks; nested blocks such as `filter` or `ingress` are free
//! to use any labels. The backend placement rule applies at every depth.
use crate::document::{Block, BlockKind, Document};

/// A document that passed [validate]
///
/// This is the only input [crate::canonical::canonicalize] accepts.
#[derive(Debug)]
pub struct Validated(Document);

impl Validated {
    pub fn into_inner(self) -> Document {
        self.0
    }
}

/// Checks all structural rules
///
/// Every rule is evaluated; the returned error lists issues in document order.
pub fn validate(document: Document) -> Result<Validated, StructuralErrors> {
    let mut e = StructuralErrors::new();

    for block in document.blocks() {
        if block.kind() == BlockKind::Backend {
            e.log(Issue::MisplacedBackend {
                labels: block.labels().to_vec(),
            });
            continue;
        }

        if let Some(expected) = required_labels(block.kind()) {
            check_label_count(&mut e, block, expected);
        }

        check_nested(&mut e, block, block.kind() == BlockKind::Terraform);
    }

    if !e.issues.is_empty() {
        return Err(e);
    }

    Ok(Validated(document))
}

fn required_labels(kind: BlockKind) -> Option<usize> {
    match kind {
        BlockKind::Resource | BlockKind::Data => Some(2),
        BlockKind::Provider | BlockKind::Variable | BlockKind::Output | BlockKind::Module => {
            Some(1)
        }
        BlockKind::Locals | BlockKind::Terraform => Some(0),
        BlockKind::Backend => Some(1),
        BlockKind::Other => None,
    }
}

fn check_label_count(e: &mut StructuralErrors, block: &Block, expected: usize) {
    let actual = block.labels().len();
    if actual != expected {
        e.log(Issue::LabelCount {
            kind: block.kind(),
            expected,
            actual,
        });
    }
}

/// `holds_backend`: `parent` is a root `terraform` block
fn check_nested(e: &mut StructuralErrors, parent: &Block, holds_backend: bool) {
    for child in parent.contents().blocks() {
        if child.kind() == BlockKind::Backend {
            if holds_backend {
                if let Some(expected) = required_labels(child.kind()) {
                    check_label_count(e, child, expected);
                }
            } else {
                e.log(Issue::MisplacedBackend {
                    labels: child.labels().to_vec(),
                });
            }
        }

        check_nested(e, child, false);
    }
}

#[derive(derive_new::new, Debug)]
pub struct StructuralErrors {
    #[new(default)]
    issues: Vec<Issue>,
}

impl StructuralErrors {
    pub fn log(&mut self, issue: Issue) {
        tracing::trace!(?issue, "issue found");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

impl std::error::Error for StructuralErrors {}

impl std::fmt::Display for StructuralErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(first) = self.issues.first() else {
            return f.write_str("structural validation failed");
        };

        write!(f, "{first}")?;
        match self.issues.len() {
            1 => Ok(()),
            2 => f.write_str(" (and 1 more issue)"),
            n => write!(f, " (and {} more issues)", n - 1),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Issue {
    LabelCount {
        kind: BlockKind,
        expected: usize,
        actual: usize,
    },
    MisplacedBackend {
        labels: Vec<String>,
    },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::LabelCount {
                kind,
                expected: 0,
                actual,
            } => write!(f, "{kind} block should not have labels: got {actual}"),
            Issue::LabelCount {
                kind,
                expected,
                actual,
            } => {
                let plural = if *expected == 1 { "label" } else { "labels" };
                write!(
                    f,
                    "{kind} block must have exactly {expected} {plural}, got {actual}"
                )
            }
            Issue::MisplacedBackend { labels } if labels.is_empty() => {
                f.write_str("backend block must be inside a terraform block")
            }
            Issue::MisplacedBackend { labels } => write!(
                f,
                "backend block \"{}\" must be inside a terraform block",
                labels.join("\" \"")
            ),
        }
    }
}
