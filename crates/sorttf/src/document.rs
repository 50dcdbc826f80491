//! in-memory model of a terraform/terragrunt document
//!
//! A parsed [hcl_edit::structure::Body] is split into a tree of [Block]s. Each level keeps its
//! attributes (unique by name, in source order) and its nested blocks apart, so ordering can be
//! computed without touching the expressions themselves.
//!
//! Decoration (comments, whitespace) stays attached to the [hcl_edit] element it was parsed with.
//! Every block also keeps its "shell": the identifier, labels and an emptied body. Turning a
//! [Document] back into hcl text re-fills those shells in model order.
use hcl_edit::structure::{Attribute, Structure};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Block types with a fixed place in the canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Terraform,
    Provider,
    Variable,
    Output,
    Resource,
    Data,
    Module,
    Locals,
    Backend,
    Other,
}

/// Sort rank of each [BlockKind], indexed by discriminant
const RANKS: [u8; 10] = [1, 2, 3, 8, 6, 5, 7, 4, 9, 10];

impl BlockKind {
    /// Maps a block identifier (case-insensitive) to its kind
    pub fn from_ident(ident: &str) -> Self {
        match ident.to_ascii_lowercase().as_str() {
            "terraform" => BlockKind::Terraform,
            "provider" => BlockKind::Provider,
            "variable" => BlockKind::Variable,
            "output" => BlockKind::Output,
            "resource" => BlockKind::Resource,
            "data" => BlockKind::Data,
            "module" => BlockKind::Module,
            "locals" => BlockKind::Locals,
            "backend" => BlockKind::Backend,
            _ => BlockKind::Other,
        }
    }

    /// Position in the canonical order, lower sorts first
    pub fn rank(self) -> u8 {
        RANKS[self as usize]
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Terraform => f.write_str("terraform"),
            BlockKind::Provider => f.write_str("provider"),
            BlockKind::Variable => f.write_str("variable"),
            BlockKind::Output => f.write_str("output"),
            BlockKind::Resource => f.write_str("resource"),
            BlockKind::Data => f.write_str("data"),
            BlockKind::Module => f.write_str("module"),
            BlockKind::Locals => f.write_str("locals"),
            BlockKind::Backend => f.write_str("backend"),
            BlockKind::Other => f.write_str("other"),
        }
    }
}

/// Attributes and nested blocks of one body
#[derive(Debug, Clone, Default)]
pub struct Contents {
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) blocks: Vec<Block>,
    /// the source body with all structures removed
    pub(crate) shell: hcl_edit::structure::Body,
}

impl Contents {
    fn from_hcl(mut body: hcl_edit::structure::Body) -> Result<Self, ParseError> {
        let mut structures = Vec::with_capacity(body.len());
        while let Some(structure) = body.pop() {
            structures.push(structure);
        }
        structures.reverse();

        let mut contents = Contents {
            attributes: IndexMap::with_capacity(structures.len()),
            blocks: Vec::new(),
            shell: body,
        };

        for structure in structures {
            match structure {
                Structure::Attribute(attribute) => {
                    let name = attribute.key.value().as_str().to_owned();
                    match contents.attributes.entry(name) {
                        Entry::Occupied(existing) => {
                            return Err(ParseError::DuplicateAttribute {
                                name: existing.key().clone(),
                            })
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(attribute);
                        }
                    }
                }
                Structure::Block(block) => contents.blocks.push(Block::from_hcl(block)?),
            }
        }

        Ok(contents)
    }

    fn into_hcl(self) -> hcl_edit::structure::Body {
        let Contents {
            attributes,
            blocks,
            mut shell,
        } = self;

        for (_name, attribute) in attributes {
            shell.push(attribute);
        }
        for block in blocks {
            shell.push(block.into_hcl());
        }

        shell
    }

    /// Attribute names in their current order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }
}

/// A block with its kind and labels resolved
#[derive(Debug, Clone)]
pub struct Block {
    pub(crate) kind: BlockKind,
    pub(crate) labels: Vec<String>,
    pub(crate) contents: Contents,
    /// identifier, labels and decor of the source block, body emptied
    shell: hcl_edit::structure::Block,
}

impl Block {
    fn from_hcl(mut block: hcl_edit::structure::Block) -> Result<Self, ParseError> {
        let body = std::mem::take(&mut block.body);

        Ok(Self {
            kind: BlockKind::from_ident(block.ident.value().as_str()),
            labels: block
                .labels
                .iter()
                .map(|label| label.as_str().to_owned())
                .collect(),
            contents: Contents::from_hcl(body)?,
            shell: block,
        })
    }

    fn into_hcl(self) -> hcl_edit::structure::Block {
        let mut block = self.shell;
        block.body = self.contents.into_hcl();
        block
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The identifier as written in the source (`resource`, `ingress`, ...)
    pub fn ident(&self) -> &str {
        self.shell.ident.value().as_str()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }
}

/// A parsed document: the root body of one file
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) contents: Contents,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let body = hcl_edit::parser::parse_body(source)?;
        Document::try_from(body)
    }

    /// Root attributes (terragrunt files carry `inputs = ...` and similar)
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.contents.attributes()
    }

    pub fn blocks(&self) -> &[Block] {
        self.contents.blocks()
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Rebuilds the hcl body in model order
    pub fn into_body(self) -> hcl_edit::structure::Body {
        self.contents.into_hcl()
    }

    /// Serializes the document as hcl text
    pub fn into_string(self) -> String {
        self.into_body().to_string()
    }
}

impl TryFrom<hcl_edit::structure::Body> for Document {
    type Error = ParseError;

    fn try_from(body: hcl_edit::structure::Body) -> Result<Self, Self::Error> {
        Ok(Self {
            contents: Contents::from_hcl(body)?,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unable to parse hcl")]
    Syntax(#[from] hcl_edit::parser::Error),
    #[error("Attribute `{name}` is defined more than once in the same body")]
    DuplicateAttribute { name: String },
}

/// Utility macro to create a [Document]
///
/// ```
/// # use sorttf::document;
/// let document = document!("resource \"aws_instance\" \"web\" {}");
/// assert_eq!(document.blocks().len(), 1);
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use sorttf::document;
/// document!("not = valid = hcl");
/// ```
#[macro_export]
macro_rules! document {
    { $expr:expr } => {
        $crate::document::Document::parse($expr).expect("document must parse")
    };
}
