//! Frontmatter extraction for the Atom Wiki compiler.
//!
//! A document may start with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started
//! tags: [intro, setup]
//! ---
//! # Body starts here
//! ```
//!
//! [`extract`] splits such a document into a normalized [`Frontmatter`] and the
//! remaining markdown body. Extraction never fails: malformed blocks degrade to
//! an empty mapping and report why through [`FrontmatterStatus`].

mod extract;
mod value;

pub use extract::{Extracted, FrontmatterStatus, extract};
pub use value::{Frontmatter, MetaValue, normalize_tags};
