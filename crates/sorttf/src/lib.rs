//! # sorttf - sort terraform files
//!
//! For CLI usage see `sorttf --help`.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `sorttf` works internally.
//!
//! ### HCL Terms
//!
//! In hcl terms...
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier`
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! ```hcl
//! # the identifier is `resource`, followed by two labels
//! resource "aws_instance" "web" {
//!   ami           = "ami-123"
//!   instance_type = "t3.micro"
//!
//!   # a nested block without labels
//!   lifecycle {
//!     create_before_destroy = true
//!   }
//! }
//! ```
//!
//! ### Pipeline
//!
//! Every file runs through [pipeline::Pipeline]:
//!
//! 1. **parse**: [document::Document::parse] uses [hcl_edit] to get a lossless tree and splits
//!    every body into attributes and nested [document::Block]s. Comments and whitespace stay
//!    attached to the element they were parsed with.
//! 2. **validate**: [validate::validate] checks label counts per block type and that `backend`
//!    only appears inside `terraform`. Only a [validate::Validated] document can be reordered.
//! 3. **canonicalize**: [canonical::canonicalize] sorts blocks by type rank and labels, and
//!    attributes by name (`for_each` first), at every level.
//! 4. **verify**: the canonical text is parsed again and its [fingerprint::fingerprint] must equal
//!    the input's. Only order may change, never content.
//! 5. **format**: [format::TerraformFmt] hands the text to `terraform fmt` for indentation and
//!    alignment.
//!
//! The result is compared with the input; equal text means there is nothing to do.
//!
//! ### Block order
//!
//! | rank | identifier  |
//! |------|-------------|
//! | 1    | `terraform` |
//! | 2    | `provider`  |
//! | 3    | `variable`  |
//! | 4    | `locals`    |
//! | 5    | `data`      |
//! | 6    | `resource`  |
//! | 7    | `module`    |
//! | 8    | `output`    |
//! | 9    | `backend`   |
//! | 10   | anything else |
//!
pub mod canonical;
pub mod document;
pub mod files;
pub mod fingerprint;
pub mod format;
pub mod pipeline;
pub mod validate;
