//! Markdown handling for scrolldoc sites.
//!
//! This crate extracts and injects YAML front matter and renders markdown into
//! an ordered list of top-level blocks ready for section partitioning.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{extract_frontmatter, inject_frontmatter, Frontmatter, PageHeader};
pub use parser::{parse_markdown, split_blocks, Block, ParseError, ParsedDoc};
