//! order-insensitive summary of what a document means
//!
//! Two documents have equal fingerprints when they hold the same blocks (identifier, labels) with
//! the same attributes and expressions, at every level, no matter in which order. Expressions are
//! compared as [hcl::Expression], so whitespace and comments do not count.
//!
//! Blocks sharing identifier and labels (multiple `ingress {}` for example) are compared in their
//! relative order, which canonical ordering never changes.
use crate::document::{Block, Contents, Document};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    attributes: BTreeMap<String, hcl::Expression>,
    blocks: Vec<BlockFingerprint>,
}

#[derive(Debug, Clone, PartialEq)]
struct BlockFingerprint {
    ident: String,
    labels: Vec<String>,
    body: Fingerprint,
}

pub fn fingerprint(document: &Document) -> Fingerprint {
    of_contents(document.contents())
}

fn of_contents(contents: &Contents) -> Fingerprint {
    let attributes = contents
        .attributes()
        .map(|(name, attribute)| (name.to_owned(), attribute.value.clone().into()))
        .collect();

    let mut blocks: Vec<BlockFingerprint> = contents.blocks().iter().map(of_block).collect();
    blocks.sort_by(|a, b| (&a.ident, &a.labels).cmp(&(&b.ident, &b.labels)));

    Fingerprint { attributes, blocks }
}

fn of_block(block: &Block) -> BlockFingerprint {
    BlockFingerprint {
        ident: block.ident().to_owned(),
        labels: block.labels().to_vec(),
        body: of_contents(block.contents()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn order_does_not_matter() {
        assert_eq!(
            fingerprint(&document!("b = 1\na = [1, 2]\nx {}\ny \"l\" {}\n")),
            fingerprint(&document!("y \"l\" {}\na = [1, 2]\nx {}\nb = 1\n"))
        );
    }

    #[test]
    fn formatting_and_comments_do_not_matter() {
        assert_eq!(
            fingerprint(&document!("a    =   1 # one\n")),
            fingerprint(&document!("// note\na = 1\n"))
        );
    }

    #[test]
    fn expression_changes_matter() {
        assert_ne!(
            fingerprint(&document!("a = 1\n")),
            fingerprint(&document!("a = 2\n"))
        );
    }

    #[test]
    fn missing_block_matters() {
        assert_ne!(
            fingerprint(&document!("x {}\nx {}\n")),
            fingerprint(&document!("x {}\n"))
        );
    }

    #[test]
    fn relative_order_of_equal_blocks_matters() {
        assert_ne!(
            fingerprint(&document!("ingress {\n  port = 1\n}\ningress {\n  port = 2\n}\n")),
            fingerprint(&document!("ingress {\n  port = 2\n}\ningress {\n  port = 1\n}\n"))
        );
    }

    #[test]
    fn nested_attributes_matter() {
        assert_ne!(
            fingerprint(&document!("x {\n  a = 1\n}\n")),
            fingerprint(&document!("x {\n  b = 1\n}\n"))
        );
    }
}
