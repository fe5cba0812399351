/// Normalize raw engine output into a single line safe for a double-quoted
/// front-matter value.
///
/// The double-space collapse is one non-overlapping pass: a run of three
/// spaces becomes two, not one.
pub fn clean_recognized_text(raw: &str) -> String {
    raw.trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('\t', " ")
        .replace("  ", " ")
        .replace('"', "'")
        .replace('\\', "\\\\")
}
