//! Placeholder injection for structurally empty table cells.
//!
//! Word templates sometimes encode an "empty but formatted" slot as a run
//! containing only `<w:br/>`, with styling attached but no text run at all.
//! Such slots are invisible to the segment extractor and therefore
//! unfillable. This pass rewrites the first qualifying run's break into a
//! single-space `<w:t xml:space="preserve"> </w:t>` so the slot becomes a
//! regular segment. It runs once, before extraction; its output is the
//! byte-offset space every later stage works against.

use tracing::debug;

use crate::error::Result;
use crate::locator::{element_ranges, element_ranges_in, find_element, next_open_tag};
use crate::patch::PatchList;
use crate::types::ByteRange;

const PLACEHOLDER_RUN_TEXT: &str = "<w:t xml:space=\"preserve\"> </w:t>";

/// Whether an exact open tag for `tag` occurs inside `within`.
fn has_open_tag(xml: &str, tag: &str, within: ByteRange) -> bool {
    matches!(next_open_tag(xml, tag, within.start), Some(at) if at < within.end)
}

/// A cell qualifies when it has no `<w:t>` anywhere, at least one `<w:br/>`,
/// and is not a purely decorative separator (`<w:pict>` present).
fn cell_qualifies(xml: &str, cell: ByteRange) -> bool {
    !has_open_tag(xml, "w:t", cell)
        && has_open_tag(xml, "w:br", cell)
        && !has_open_tag(xml, "w:pict", cell)
}

/// Rewrite every qualifying table cell, injecting exactly one placeholder
/// per cell. Cells that do not qualify pass through untouched.
pub fn inject_placeholders(xml: &str) -> Result<String> {
    let mut patches = PatchList::new();

    for table in element_ranges(xml, "w:tbl") {
        for row in element_ranges_in(xml, "w:tr", table) {
            for cell in element_ranges_in(xml, "w:tc", row) {
                if !cell_qualifies(xml, cell) {
                    continue;
                }
                // First run owning a break gets the placeholder; further
                // breaks in the cell keep their line-break meaning.
                for run in element_ranges_in(xml, "w:r", cell) {
                    let Some(br) = find_element(xml, "w:br", run.start) else {
                        continue;
                    };
                    if br.end <= run.end {
                        patches.push(br.start, br.end, PLACEHOLDER_RUN_TEXT);
                        break;
                    }
                }
            }
        }
    }

    if patches.is_empty() {
        return Ok(xml.to_string());
    }
    debug!("Injected {} placeholder text nodes", patches.len());
    patches.apply(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_br_only_cell_gets_one_placeholder() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:br/></w:r>\
                   <w:r><w:br/></w:r></w:p></w:tc></w:tr></w:tbl>";
        let out = inject_placeholders(xml).unwrap();
        assert_eq!(out.matches(PLACEHOLDER_RUN_TEXT).count(), 1);
        // Only the first break is replaced.
        assert_eq!(out.matches("<w:br/>").count(), 1);
        // Run properties stay in place.
        assert!(out.contains("<w:rPr><w:b/></w:rPr>"));
    }

    #[test]
    fn test_cell_with_text_is_untouched() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>x</w:t></w:r><w:r><w:br/></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(inject_placeholders(xml).unwrap(), xml);
    }

    #[test]
    fn test_decorative_separator_is_untouched() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:pict></w:pict><w:br/></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(inject_placeholders(xml).unwrap(), xml);
    }

    #[test]
    fn test_attributed_break_qualifies() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:br w:type=\"textWrapping\"/></w:r></w:p></w:tc></w:tr></w:tbl>";
        let out = inject_placeholders(xml).unwrap();
        assert!(out.contains(PLACEHOLDER_RUN_TEXT));
        assert!(!out.contains("<w:br"));
    }

    #[test]
    fn test_body_breaks_are_ignored() {
        let xml = "<w:p><w:r><w:br/></w:r></w:p>";
        assert_eq!(inject_placeholders(xml).unwrap(), xml);
    }
}
