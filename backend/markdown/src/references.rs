//! Embedded image reference extraction.
//!
//! Recognizes the wiki-embed form `![[<token>]]` where `<token>` ends in one of
//! the configured image extensions, compared case-insensitively.

use regex::{Regex, RegexBuilder};
use tracing::debug;

pub struct ReferenceExtractor {
    /// `None` when no extensions are configured: nothing can match.
    pattern: Option<Regex>,
    marker: String,
}

impl ReferenceExtractor {
    /// Build an extractor for `extensions` (with or without the leading dot).
    ///
    /// `field_name` is the recognized-text key; `<field_name>:` anywhere in a
    /// document marks it as already processed.
    pub fn new<S: AsRef<str>>(extensions: &[S], field_name: &str) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = extensions
            .iter()
            .map(|ext| ext.as_ref().trim())
            .filter(|ext| !ext.is_empty() && *ext != ".")
            .map(|ext| regex::escape(&format!(".{}", ext.trim_start_matches('.'))))
            .collect();

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let source = format!(r"!\[\[([^\]]+?(?:{}))\]\]", alternatives.join("|"));
            Some(RegexBuilder::new(&source).case_insensitive(true).build()?)
        };

        Ok(Self { pattern, marker: format!("{field_name}:") })
    }

    /// Whether the document already carries the recognized-text field.
    pub fn is_annotated(&self, text: &str) -> bool {
        text.contains(&self.marker)
    }

    /// Every reference token in order of appearance, duplicates kept.
    ///
    /// Returns nothing for an annotated document unless `overwrite` is set.
    pub fn extract(&self, text: &str, overwrite: bool) -> Vec<String> {
        if !overwrite && self.is_annotated(text) {
            debug!(marker = %self.marker, "Document already annotated; skipping");
            return Vec::new();
        }
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
