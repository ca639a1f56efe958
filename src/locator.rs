//! Tag-aware range locator.
//!
//! Finds the byte range of a balanced XML element by tag name, using a
//! single forward scan over `<` positions with a nesting-depth counter.
//! Open-tag matching is exact: locating `w:tbl` never matches `<w:tblPr`,
//! because the character after the tag name must be whitespace, `>` or `/`.
//! Self-closing occurrences (`<tag …/>`) do not change the depth.

use crate::types::ByteRange;

/// Whether `xml[at..]` starts an open tag for exactly `tag`.
fn is_exact_open_tag(xml: &str, at: usize, tag: &str) -> bool {
    let bytes = xml.as_bytes();
    if bytes.get(at) != Some(&b'<') {
        return false;
    }
    let name_end = at + 1 + tag.len();
    if !xml[at + 1..].starts_with(tag) {
        return false;
    }
    matches!(
        bytes.get(name_end),
        Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/')
    )
}

/// Position of the next exact open tag for `tag` at or after `from`.
pub fn next_open_tag(xml: &str, tag: &str, from: usize) -> Option<usize> {
    let mut pos = from.min(xml.len());
    while let Some(rel) = xml[pos..].find('<') {
        let at = pos + rel;
        if is_exact_open_tag(xml, at, tag) {
            return Some(at);
        }
        pos = at + 1;
    }
    None
}

/// Byte range of the next balanced `tag` element at or after `from`.
///
/// Returns `None` when there is no further occurrence, or when a close tag
/// is never found for the occurrence (the caller stops enumerating rather
/// than crashing on malformed input).
pub fn find_element(xml: &str, tag: &str, from: usize) -> Option<ByteRange> {
    let start = next_open_tag(xml, tag, from)?;
    let close = format!("</{tag}>");
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(rel) = xml[pos..].find('<') {
        let at = pos + rel;
        if xml[at..].starts_with(&close) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(ByteRange::new(start, at + close.len()));
            }
            pos = at + close.len();
        } else if is_exact_open_tag(xml, at, tag) {
            let gt = at + xml[at..].find('>')?;
            if xml.as_bytes()[gt - 1] == b'/' {
                // Self-closing. The element we were asked for may itself be
                // self-closing; anything later is a depth-neutral sibling.
                if at == start {
                    return Some(ByteRange::new(start, gt + 1));
                }
            } else {
                depth += 1;
            }
            pos = gt + 1;
        } else {
            pos = at + 1;
        }
    }
    None
}

/// All non-overlapping top-level `tag` elements in `xml`, in document order.
pub fn element_ranges(xml: &str, tag: &str) -> Vec<ByteRange> {
    element_ranges_from(xml, tag, 0, xml.len())
}

/// All non-overlapping top-level `tag` elements inside `within`.
pub fn element_ranges_in(xml: &str, tag: &str, within: ByteRange) -> Vec<ByteRange> {
    element_ranges_from(xml, tag, within.start, within.end)
}

fn element_ranges_from(xml: &str, tag: &str, from: usize, until: usize) -> Vec<ByteRange> {
    let mut ranges = Vec::new();
    let mut pos = from;
    while let Some(range) = find_element(xml, tag, pos) {
        if range.end > until {
            break;
        }
        pos = range.end;
        ranges.push(range);
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_open_tag_rejects_prefix_collision() {
        let xml = "<w:tbl><w:tblPr><w:tblStyle/></w:tblPr></w:tbl>";
        let range = find_element(xml, "w:tbl", 0).unwrap();
        assert_eq!(range, ByteRange::new(0, xml.len()));
        // No second occurrence: tblPr must not have been counted as one.
        assert!(find_element(xml, "w:tbl", range.end).is_none());
    }

    #[test]
    fn test_nested_same_tag_depth() {
        let xml = "<a><a>inner</a></a><a>second</a>";
        let ranges = element_ranges(xml, "a");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&xml[ranges[0].start..ranges[0].end], "<a><a>inner</a></a>");
        assert_eq!(&xml[ranges[1].start..ranges[1].end], "<a>second</a>");
    }

    #[test]
    fn test_self_closing_occurrences_are_skipped() {
        let xml = "<w:p><w:p/><w:r/></w:p>";
        let range = find_element(xml, "w:p", 0).unwrap();
        assert_eq!(range, ByteRange::new(0, xml.len()));
    }

    #[test]
    fn test_self_closing_first_occurrence() {
        let xml = "text<w:p/>more";
        let range = find_element(xml, "w:p", 0).unwrap();
        assert_eq!(&xml[range.start..range.end], "<w:p/>");
    }

    #[test]
    fn test_open_tag_with_attributes() {
        let xml = r#"<w:t xml:space="preserve">hi</w:t>"#;
        let range = find_element(xml, "w:t", 0).unwrap();
        assert_eq!(range, ByteRange::new(0, xml.len()));
    }

    #[test]
    fn test_unbalanced_aborts_without_panic() {
        let xml = "<w:tr><w:tc>no close";
        assert!(find_element(xml, "w:tr", 0).is_none());
        // Earlier balanced occurrences are still found before the abort.
        let xml = "<w:tr>a</w:tr><w:tr>broken";
        let ranges = element_ranges(xml, "w:tr");
        assert_eq!(ranges.len(), 1);
        assert_eq!(&xml[ranges[0].start..ranges[0].end], "<w:tr>a</w:tr>");
    }

    #[test]
    fn test_enumeration_within_range() {
        let xml = "<w:tc><w:p>a</w:p><w:p>b</w:p></w:tc><w:p>outside</w:p>";
        let cell = find_element(xml, "w:tc", 0).unwrap();
        let paras = element_ranges_in(xml, "w:p", cell);
        assert_eq!(paras.len(), 2);
        assert!(paras.iter().all(|p| p.end <= cell.end));
    }
}
