//! Template map rendering.
//!
//! Builds the compact, line-oriented textual view of the document's fillable
//! structure that the external content-generation step receives. This text
//! is the only structural information that step sees, so every line spells
//! out exactly which segment ID(s) to target.

use crate::merge::ParagraphGroup;
use crate::types::{StructuredSegment, TableInfo};

const PARAGRAPH_PREVIEW: usize = 80;
const TAB_PART_PREVIEW: usize = 40;
const CELL_PREVIEW: usize = 60;

/// Truncate to `max` characters, appending `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

fn render_part(segments: &[StructuredSegment], part: &[usize], max: usize) -> String {
    let text: String = part.iter().map(|&idx| segments[idx].text.as_str()).collect();
    format!("[{}] \"{}\"", segments[part[0]].id, truncate(&text, max))
}

fn render_cell(cell_text: &str, segment_ids: &[String]) -> String {
    if segment_ids.is_empty() {
        return "(empty)".to_string();
    }
    let ids = format!("[{}]", segment_ids.join(","));
    if cell_text.trim().is_empty() {
        format!("{ids} (placeholder - fill with content)")
    } else {
        format!("{ids} \"{}\"", truncate(cell_text, CELL_PREVIEW))
    }
}

/// Render the full template map: a "Body Paragraphs" block followed by one
/// block per table.
pub fn build_template_map(
    segments: &[StructuredSegment],
    tables: &[TableInfo],
    groups: &[ParagraphGroup],
) -> String {
    let mut out = String::new();

    if !groups.is_empty() {
        out.push_str("Body Paragraphs:\n");
        for group in groups {
            let max = if group.parts.len() > 1 {
                TAB_PART_PREVIEW
            } else {
                PARAGRAPH_PREVIEW
            };
            let line = group
                .parts
                .iter()
                .map(|part| render_part(segments, part, max))
                .collect::<Vec<_>>()
                .join(" [TAB] ");
            out.push_str(&line);
            out.push('\n');
        }
    }

    for (table_idx, table) in tables.iter().enumerate() {
        let rows = table.rows.len();
        let cols = table.rows.first().map(|row| row.cells.len()).unwrap_or(0);
        let preview = table
            .rows
            .first()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| cell.text.trim())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .unwrap_or_default();

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "--- Table {} ({} rows x {} cols) [{}] ---\n",
            table_idx + 1,
            rows,
            cols,
            truncate(&preview, CELL_PREVIEW)
        ));
        for (row_idx, row) in table.rows.iter().enumerate() {
            let cells = row
                .cells
                .iter()
                .map(|cell| render_cell(&cell.text, &cell.segment_ids))
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&format!("Row {row_idx}: {cells}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 10), "0123456789...");
        // Char-based, not byte-based.
        assert_eq!(truncate("ééééé", 5), "ééééé");
    }

    #[test]
    fn test_render_cell_variants() {
        assert_eq!(render_cell("", &[]), "(empty)");
        assert_eq!(
            render_cell(" ", &["s3".to_string()]),
            "[s3] (placeholder - fill with content)"
        );
        assert_eq!(
            render_cell("Amsterdam", &["s1".to_string(), "s2".to_string()]),
            "[s1,s2] \"Amsterdam\""
        );
    }
}
