//! Structural segment extraction.
//!
//! Walks tables → rows → cells → paragraphs and collects one segment per
//! `<w:t>` occurrence with full structural context, then separately scans
//! for body-level text outside any table. Matches land in a discovery-order
//! arena; external IDs (`s0`, `s1`, …) are assigned exactly once, over a
//! view of the arena sorted by byte offset, and table-cell cross-references
//! are materialized from arena indices only after that sort.

use tracing::info;

use crate::error::{Result, SegmentError};
use crate::locator::{element_ranges, element_ranges_in};
use crate::merge::{group_body_paragraphs, merge_groups_from};
use crate::placeholder::inject_placeholders;
use crate::template_map::build_template_map;
use crate::types::{
    ByteRange, ExtractionResult, SegmentContext, SegmentLocation, StructuredSegment,
    TableCellInfo, TableInfo, TableRowInfo,
};
use crate::xml::text_element_content;

/// A matched text run before IDs exist.
struct RawSegment {
    text: String,
    xml_text: String,
    range: ByteRange,
    location: SegmentLocation,
}

struct CellDraft {
    range: ByteRange,
    arena_indices: Vec<usize>,
}

struct RowDraft {
    range: ByteRange,
    cells: Vec<CellDraft>,
}

struct TableDraft {
    range: ByteRange,
    rows: Vec<RowDraft>,
}

/// Enclosing paragraph of a body segment: nearest `<w:p>`/`<w:p …>` before
/// it, nearest `</w:p>` after it. Falls back to the segment's own range when
/// either side is missing.
fn resolve_body_paragraph(xml: &str, segment: ByteRange) -> ByteRange {
    let before = &xml[..segment.start];
    let open = match (before.rfind("<w:p>"), before.rfind("<w:p ")) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    let close = xml[segment.end..]
        .find("</w:p>")
        .map(|rel| segment.end + rel + "</w:p>".len());
    match (open, close) {
        (Some(start), Some(end)) => ByteRange::new(start, end),
        _ => segment,
    }
}

fn raw_segment(processed: &str, range: ByteRange, location: SegmentLocation) -> RawSegment {
    let xml_text = processed[range.start..range.end].to_string();
    RawSegment {
        text: text_element_content(&xml_text),
        xml_text,
        range,
        location,
    }
}

/// Extract every editable text run of an OOXML `document.xml` body, with
/// structural context, merge groups and the template map.
///
/// The returned [`ExtractionResult`] is the authoritative snapshot for one
/// pipeline run: its `processed_xml` (placeholder injection applied) is the
/// byte-offset space the fill and duplication stages must be given.
pub fn extract_structured_segments(doc_xml: &str) -> Result<ExtractionResult> {
    if doc_xml.trim().is_empty() {
        return Err(SegmentError::EmptyDocument);
    }
    let processed = inject_placeholders(doc_xml)?;

    let mut arena: Vec<RawSegment> = Vec::new();
    let mut drafts: Vec<TableDraft> = Vec::new();

    // Table pass: tbl → tr → tc → p, one segment per text run in the cell.
    // A nested table's runs are attributed to the enclosing outer cell.
    let table_ranges = element_ranges(&processed, "w:tbl");
    for (table_idx, &table_range) in table_ranges.iter().enumerate() {
        let mut rows = Vec::new();
        for (row_idx, row_range) in element_ranges_in(&processed, "w:tr", table_range)
            .into_iter()
            .enumerate()
        {
            let mut cells = Vec::new();
            for (cell_idx, cell_range) in element_ranges_in(&processed, "w:tc", row_range)
                .into_iter()
                .enumerate()
            {
                let paragraphs = element_ranges_in(&processed, "w:p", cell_range);
                let mut arena_indices = Vec::new();
                for text_range in element_ranges_in(&processed, "w:t", cell_range) {
                    let paragraph = paragraphs
                        .iter()
                        .copied()
                        .find(|p| p.contains(text_range.start))
                        .unwrap_or(cell_range);
                    let location = SegmentLocation {
                        context: SegmentContext::Table,
                        table_index: Some(table_idx),
                        row_index: Some(row_idx),
                        cell_index: Some(cell_idx),
                        paragraph,
                        table_row: Some(row_range),
                    };
                    arena_indices.push(arena.len());
                    arena.push(raw_segment(&processed, text_range, location));
                }
                cells.push(CellDraft {
                    range: cell_range,
                    arena_indices,
                });
            }
            rows.push(RowDraft {
                range: row_range,
                cells,
            });
        }
        drafts.push(TableDraft {
            range: table_range,
            rows,
        });
    }

    // Body pass: every text run not inside any table range.
    let table_count = arena.len();
    for text_range in element_ranges(&processed, "w:t") {
        if table_ranges.iter().any(|t| t.contains(text_range.start)) {
            continue;
        }
        let location = SegmentLocation {
            context: SegmentContext::Body,
            table_index: None,
            row_index: None,
            cell_index: None,
            paragraph: resolve_body_paragraph(&processed, text_range),
            table_row: None,
        };
        arena.push(raw_segment(&processed, text_range, location));
    }
    let body_count = arena.len() - table_count;

    // Sort a view of arena indices by byte offset and derive external IDs
    // from the sorted positions.
    let mut order: Vec<usize> = (0..arena.len()).collect();
    order.sort_by_key(|&idx| arena[idx].range.start);
    let mut id_by_arena = vec![String::new(); arena.len()];
    for (seq, &arena_idx) in order.iter().enumerate() {
        id_by_arena[arena_idx] = format!("s{seq}");
    }

    let segments: Vec<StructuredSegment> = order
        .iter()
        .map(|&idx| {
            let raw = &arena[idx];
            StructuredSegment {
                id: id_by_arena[idx].clone(),
                text: raw.text.clone(),
                xml_text: raw.xml_text.clone(),
                start: raw.range.start,
                end: raw.range.end,
                location: raw.location.clone(),
            }
        })
        .collect();

    let tables: Vec<TableInfo> = drafts
        .into_iter()
        .map(|table| TableInfo {
            range: table.range,
            rows: table
                .rows
                .into_iter()
                .map(|row| TableRowInfo {
                    range: row.range,
                    cells: row
                        .cells
                        .into_iter()
                        .map(|cell| TableCellInfo {
                            range: cell.range,
                            text: cell
                                .arena_indices
                                .iter()
                                .map(|&idx| arena[idx].text.as_str())
                                .collect(),
                            segment_ids: cell
                                .arena_indices
                                .iter()
                                .map(|&idx| id_by_arena[idx].clone())
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let groups = group_body_paragraphs(&processed, &segments);
    let merge_groups = merge_groups_from(&segments, &groups);
    let template_map = build_template_map(&segments, &tables, &groups);

    info!(
        "Extracted {} segments ({} body, {} in {} tables), {} merge groups",
        segments.len(),
        body_count,
        table_count,
        tables.len(),
        merge_groups.len()
    );

    Ok(ExtractionResult {
        segments,
        tables,
        template_map,
        processed_xml: processed,
        merge_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_paragraph_resolution() {
        let xml = "<w:p w:rsidR=\"0\"><w:r><w:t>x</w:t></w:r></w:p>";
        let seg = ByteRange::new(22, 34);
        let para = resolve_body_paragraph(xml, seg);
        assert_eq!(para, ByteRange::new(0, xml.len()));
    }

    #[test]
    fn test_body_paragraph_fallback_is_own_range() {
        let xml = "<w:t>loose</w:t>";
        let seg = ByteRange::new(0, xml.len());
        assert_eq!(resolve_body_paragraph(xml, seg), seg);
    }
}
