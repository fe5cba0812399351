//! Front-matter block location and recognized-text field merge.
//!
//! The block is line-oriented `key: value` text between two `---` lines at the
//! very start of a document. Only the recognized-text field is ever rewritten;
//! every other byte of the document is carried over verbatim.

const BOM: char = '\u{feff}';

/// Line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

/// Byte ranges of a metadata block within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataBlock {
    /// Start of the first line after the opening delimiter.
    pub body_start: usize,
    /// Start of the closing delimiter line.
    pub body_end: usize,
    /// Line ending used by the opening delimiter.
    pub newline: &'static str,
}

impl MetadataBlock {
    pub fn body<'a>(&self, document: &'a str) -> &'a str {
        &document[self.body_start..self.body_end]
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Find the metadata block at the head of `document`.
///
/// An opening delimiter without a closing one is not a block.
pub fn locate_block(document: &str) -> Option<MetadataBlock> {
    let offset = if document.starts_with(BOM) { BOM.len_utf8() } else { 0 };
    let mut lines = document[offset..].split_inclusive('\n');

    let opening = lines.next()?;
    if !opening.ends_with('\n') || !is_delimiter(opening) {
        return None;
    }
    let newline = if opening.ends_with("\r\n") { "\r\n" } else { "\n" };
    let body_start = offset + opening.len();

    let mut pos = body_start;
    for line in lines {
        if is_delimiter(line) {
            return Some(MetadataBlock { body_start, body_end: pos, newline });
        }
        pos += line.len();
    }
    None
}

/// Merge `value` into `document` as the `field` entry of its metadata block.
///
/// Returns `None` when `value` is empty: nothing recognized means the
/// document is left alone. `value` must already be cleaned for a double-quoted
/// scalar. Merging the same value twice yields the same document as merging once.
pub fn merge_field(document: &str, field: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let entry = format!("{field}: \"{value}\"");

    let Some(block) = locate_block(document) else {
        let (bom, rest) = match document.strip_prefix(BOM) {
            Some(rest) => (&document[..BOM.len_utf8()], rest),
            None => ("", document),
        };
        return Some(format!("{bom}{DELIMITER}\n{entry}\n{DELIMITER}\n{rest}"));
    };

    let body = upsert_entry(block.body(document), field, &entry, block.newline);
    let mut merged = String::with_capacity(document.len() + entry.len());
    merged.push_str(&document[..block.body_start]);
    merged.push_str(&body);
    merged.push_str(&document[block.body_end..]);
    Some(merged)
}

/// Replace the first `field:` line (and its indented continuation lines),
/// drop any later duplicates, or append the entry when the field is absent.
fn upsert_entry(body: &str, field: &str, entry: &str, newline: &str) -> String {
    let key = format!("{field}:");
    let mut out = String::with_capacity(body.len() + entry.len() + newline.len());
    let mut written = false;
    let mut in_field = false;

    for line in body.split_inclusive('\n') {
        if in_field && line.starts_with([' ', '\t']) {
            continue;
        }
        in_field = false;

        if line.starts_with(&key) {
            in_field = true;
            if !written {
                out.push_str(entry);
                out.push_str(line_ending(line).unwrap_or(newline));
                written = true;
            }
            continue;
        }
        out.push_str(line);
    }

    if !written {
        out.push_str(entry);
        out.push_str(newline);
    }
    out
}

fn line_ending(line: &str) -> Option<&'static str> {
    if line.ends_with("\r\n") {
        Some("\r\n")
    } else if line.ends_with('\n') {
        Some("\n")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_block_ranges() {
        let doc = "---\ntitle: Trip\n---\nBody";
        let block = locate_block(doc).unwrap();
        assert_eq!(block.body(doc), "title: Trip\n");
        assert_eq!(&doc[block.body_end..], "---\nBody");
    }

    #[test]
    fn block_must_start_the_document() {
        assert!(locate_block("intro\n---\na: b\n---\n").is_none());
    }

    #[test]
    fn unterminated_block_is_not_a_block() {
        assert!(locate_block("---\ntitle: x\nno end").is_none());
    }

    #[test]
    fn empty_block_is_a_block() {
        let doc = "---\n---\nBody";
        let block = locate_block(doc).unwrap();
        assert_eq!(block.body(doc), "");
    }

    #[test]
    fn prepends_block_when_missing() {
        let merged = merge_field("# Trip\n\n![[a.png]]\n", "OCR", "hello world").unwrap();
        assert_eq!(merged, "---\nOCR: \"hello world\"\n---\n# Trip\n\n![[a.png]]\n");
    }

    #[test]
    fn appends_field_to_existing_block() {
        let doc = "---\ntitle: Trip\ntags: [a, b]\n---\nBody\n";
        let merged = merge_field(doc, "OCR", "text").unwrap();
        assert_eq!(merged, "---\ntitle: Trip\ntags: [a, b]\nOCR: \"text\"\n---\nBody\n");
    }

    #[test]
    fn replaces_existing_field_only() {
        let doc = "---\ntitle: Trip\nOCR: \"old text\"\nauthor: me\n---\nBody ---\n";
        let merged = merge_field(doc, "OCR", "new").unwrap();
        assert_eq!(merged, "---\ntitle: Trip\nOCR: \"new\"\nauthor: me\n---\nBody ---\n");
    }

    #[test]
    fn replaces_multiline_value_and_duplicates() {
        let doc = "---\nOCR: >\n  folded\n  value\ntitle: x\nOCR: \"dup\"\n---\n";
        let merged = merge_field(doc, "OCR", "v").unwrap();
        assert_eq!(merged, "---\nOCR: \"v\"\ntitle: x\n---\n");
    }

    #[test]
    fn nested_keys_with_same_name_are_untouched() {
        let doc = "---\nmeta:\n  OCR: keep\n---\n";
        let merged = merge_field(doc, "OCR", "v").unwrap();
        assert_eq!(merged, "---\nmeta:\n  OCR: keep\nOCR: \"v\"\n---\n");
    }

    #[test]
    fn unterminated_block_gets_fresh_block_prepended() {
        let doc = "---\ntitle: x\nbody";
        let merged = merge_field(doc, "OCR", "v").unwrap();
        assert_eq!(merged, "---\nOCR: \"v\"\n---\n---\ntitle: x\nbody");
    }

    #[test]
    fn merge_is_idempotent() {
        for doc in ["plain body", "---\na: 1\n---\nbody", "---\nOCR: \"x\"\n---\n"] {
            let once = merge_field(doc, "OCR", "some 'text'").unwrap();
            let twice = merge_field(&once, "OCR", "some 'text'").unwrap();
            assert_eq!(once, twice, "not idempotent for {doc:?}");
        }
    }

    #[test]
    fn empty_value_leaves_document_alone() {
        assert!(merge_field("---\na: 1\n---\n", "OCR", "").is_none());
    }

    #[test]
    fn preserves_crlf_line_endings() {
        let doc = "---\r\ntitle: x\r\n---\r\nBody\r\n";
        let merged = merge_field(doc, "OCR", "v").unwrap();
        assert_eq!(merged, "---\r\ntitle: x\r\nOCR: \"v\"\r\n---\r\nBody\r\n");
    }

    #[test]
    fn keeps_byte_order_mark_in_front() {
        let merged = merge_field("\u{feff}body", "OCR", "v").unwrap();
        assert_eq!(merged, "\u{feff}---\nOCR: \"v\"\n---\nbody");
    }

    #[test]
    fn value_with_dollar_signs_is_literal() {
        let merged = merge_field("---\nOCR: \"a\"\n---\n", "OCR", "$1 costs $2").unwrap();
        assert_eq!(merged, "---\nOCR: \"$1 costs $2\"\n---\n");
    }
}
