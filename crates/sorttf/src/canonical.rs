//! canonical ordering of blocks and attributes
//!
//! Blocks are ordered by the rank of their [BlockKind](crate::document::BlockKind), then by their
//! labels (element-wise, a shorter prefix first). Attributes are ordered by name, except
//! [PINNED_ATTRIBUTE] which always comes first. Both rules apply to every nesting level. All sorts
//! are stable: equal blocks keep their relative source order.
//!
//! Inside a body attributes are emitted before nested blocks.
use crate::document::{Block, Contents, Document};
use crate::validate::Validated;
use hcl_edit::structure::Attribute;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Attribute placed before all others
pub const PINNED_ATTRIBUTE: &str = "for_each";

/// Reorders a validated document into canonical order
pub fn canonicalize(validated: Validated) -> Document {
    let document = validated.into_inner();
    tracing::debug!(
        attributes = document.contents.attributes.len(),
        blocks = document.contents.blocks.len(),
        "canonicalize document"
    );

    Document {
        contents: canonical_contents(document.contents),
    }
}

fn canonical_contents(contents: Contents) -> Contents {
    let Contents {
        attributes,
        blocks,
        shell,
    } = contents;

    Contents {
        attributes: order_attributes(attributes),
        blocks: order_blocks(blocks),
        shell,
    }
}

fn order_attributes(mut attributes: IndexMap<String, Attribute>) -> IndexMap<String, Attribute> {
    let pinned = attributes.shift_remove_entry(PINNED_ATTRIBUTE);
    attributes.sort_keys();

    pinned.into_iter().chain(attributes).collect()
}

fn order_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut blocks: Vec<Block> = blocks
        .into_iter()
        .map(|mut block| {
            block.contents = canonical_contents(std::mem::take(&mut block.contents));
            block
        })
        .collect();

    // `sort_by` is stable
    blocks.sort_by(compare_blocks);

    for block in &blocks {
        tracing::trace!(kind = %block.kind, labels = ?block.labels, "ordered block");
    }

    blocks
}

/// Total order over blocks: rank, then labels
pub fn compare_blocks(a: &Block, b: &Block) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| compare_labels(&a.labels, &b.labels))
}

/// Lexicographic label order; a strict prefix sorts first
pub fn compare_labels(a: &[String], b: &[String]) -> Ordering {
    a.cmp(b)
}
