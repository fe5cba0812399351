//! Markdown document surgery for the OCR pipeline.
//!
//! Finds embedded image references in a note and merges recognized text into
//! the note's front-matter block without touching anything else.

pub mod frontmatter;
pub mod references;

pub use frontmatter::{locate_block, merge_field, MetadataBlock, DELIMITER};
pub use references::ReferenceExtractor;
