//! Merge-group resolution for fragmented body runs.
//!
//! Word splits a single logical value ("2020-2025") into several adjacent
//! runs at spell-check or formatting boundaries. Body segments sharing a
//! paragraph are regrouped into one fill target, except across `<w:tab/>`
//! boundaries: tabs separate unrelated fields on one line ("Label: ⇥ Value"),
//! so merging never crosses them. Table-cell runs are not merge-grouped.

use std::collections::{BTreeMap, HashMap};

use crate::types::{SegmentContext, StructuredSegment};

/// Body segments of one paragraph, split into tab-separated parts.
/// Values are indices into the sorted segment list.
#[derive(Debug)]
pub struct ParagraphGroup {
    pub paragraph_start: usize,
    pub parts: Vec<Vec<usize>>,
}

fn has_tab(between: &str) -> bool {
    between.contains("<w:tab/>") || between.contains("<w:tab ")
}

/// Group body segments by shared paragraph start, splitting each group at
/// every tab boundary. `xml` must be the processed snapshot the segments
/// were extracted from. Paragraph order follows document order.
pub fn group_body_paragraphs(xml: &str, segments: &[StructuredSegment]) -> Vec<ParagraphGroup> {
    let mut by_paragraph: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, segment) in segments.iter().enumerate() {
        if segment.location.context == SegmentContext::Body {
            by_paragraph
                .entry(segment.location.paragraph.start)
                .or_default()
                .push(idx);
        }
    }

    by_paragraph
        .into_iter()
        .map(|(paragraph_start, indices)| {
            let mut parts: Vec<Vec<usize>> = vec![vec![indices[0]]];
            for pair in indices.windows(2) {
                let between = &xml[segments[pair[0]].end..segments[pair[1]].start];
                if has_tab(between) {
                    parts.push(Vec::new());
                }
                parts.last_mut().unwrap().push(pair[1]);
            }
            ParagraphGroup {
                paragraph_start,
                parts,
            }
        })
        .collect()
}

/// Leader → followers map. Every tab-separated part with at least two
/// segments becomes its own merge group; the part's first segment leads.
pub fn merge_groups_from(
    segments: &[StructuredSegment],
    groups: &[ParagraphGroup],
) -> HashMap<String, Vec<String>> {
    let mut merge_groups = HashMap::new();
    for group in groups {
        for part in &group.parts {
            if part.len() < 2 {
                continue;
            }
            let leader = segments[part[0]].id.clone();
            let followers = part[1..]
                .iter()
                .map(|&idx| segments[idx].id.clone())
                .collect();
            merge_groups.insert(leader, followers);
        }
    }
    merge_groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_structured_segments;
    use crate::locator::element_ranges;
    use crate::types::{ByteRange, SegmentLocation};
    use crate::xml::text_element_content;

    fn body(inner: &str) -> String {
        format!("<w:document><w:body>{inner}</w:body></w:document>")
    }

    /// One body segment per `<w:t>` in `xml`, all sharing one paragraph.
    fn body_segments(xml: &str) -> Vec<StructuredSegment> {
        let paragraph = ByteRange::new(0, xml.len());
        element_ranges(xml, "w:t")
            .into_iter()
            .enumerate()
            .map(|(idx, range)| {
                let xml_text = xml[range.start..range.end].to_string();
                StructuredSegment {
                    id: format!("s{idx}"),
                    text: text_element_content(&xml_text),
                    xml_text,
                    start: range.start,
                    end: range.end,
                    location: SegmentLocation {
                        context: SegmentContext::Body,
                        table_index: None,
                        row_index: None,
                        cell_index: None,
                        paragraph,
                        table_row: None,
                    },
                }
            })
            .collect()
    }

    #[test]
    fn test_grouping_splits_parts_at_tab_boundaries() {
        let xml = "<w:p><w:r><w:t>20</w:t></w:r><w:r><w:t>20</w:t></w:r>\
                   <w:r><w:tab/></w:r><w:r><w:t>now</w:t></w:r></w:p>";
        let segments = body_segments(xml);
        let groups = group_body_paragraphs(xml, &segments);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paragraph_start, 0);
        assert_eq!(groups[0].parts, vec![vec![0, 1], vec![2]]);

        // Only the pre-tab part has two segments, so only it merges.
        let merge_groups = merge_groups_from(&segments, &groups);
        assert_eq!(merge_groups.len(), 1);
        assert_eq!(merge_groups["s0"], vec!["s1".to_string()]);
    }

    #[test]
    fn test_table_segments_are_not_grouped() {
        let xml = "<w:p><w:r><w:t>left</w:t></w:r><w:r><w:t>right</w:t></w:r></w:p>";
        let mut segments = body_segments(xml);
        for segment in &mut segments {
            segment.location.context = SegmentContext::Table;
        }
        assert!(group_body_paragraphs(xml, &segments).is_empty());
    }

    #[test]
    fn test_adjacent_runs_without_tab_merge() {
        let xml = body("<w:p><w:r><w:t>Jan</w:t></w:r><w:r><w:t>Jansen</w:t></w:r></w:p>");
        let result = extract_structured_segments(&xml).unwrap();
        assert_eq!(result.merge_groups.len(), 1);
        assert_eq!(result.merge_groups["s0"], vec!["s1".to_string()]);
    }

    #[test]
    fn test_tab_boundary_splits_groups() {
        let xml = body(
            "<w:p><w:r><w:t>Email:</w:t></w:r><w:r><w:tab/></w:r>\
             <w:r><w:t>jan@example.com</w:t></w:r></w:p>",
        );
        let result = extract_structured_segments(&xml).unwrap();
        // One segment on each side of the tab: nothing to merge.
        assert!(result.merge_groups.is_empty());
    }

    #[test]
    fn test_sub_groups_merge_independently() {
        let xml = body(
            "<w:p><w:r><w:t>Na</w:t></w:r><w:r><w:t>am:</w:t></w:r><w:r><w:tab/></w:r>\
             <w:r><w:t>Jan</w:t></w:r><w:r><w:t>Jansen</w:t></w:r></w:p>",
        );
        let result = extract_structured_segments(&xml).unwrap();
        assert_eq!(result.merge_groups.len(), 2);
        assert_eq!(result.merge_groups["s0"], vec!["s1".to_string()]);
        assert_eq!(result.merge_groups["s2"], vec!["s3".to_string()]);
    }

    #[test]
    fn test_separate_paragraphs_never_merge() {
        let xml = body(
            "<w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:t>two</w:t></w:r></w:p>",
        );
        let result = extract_structured_segments(&xml).unwrap();
        assert!(result.merge_groups.is_empty());
    }
}
