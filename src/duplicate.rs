//! Block duplication for repeating template sections.
//!
//! Given the externally computed blueprint and the desired instance counts
//! per semantic section, clones the last instance of each under-sized
//! repeating block until the target count is met. Table-row blocks splice
//! extra `<w:tr>` elements right after the original block; paragraph groups
//! get an empty `<w:p></w:p>` spacer before each repetition to preserve
//! paragraph separation. All insertions go through the shared patch list,
//! so they apply in descending offset order and never invalidate each other.

use tracing::{info, warn};

use crate::error::Result;
use crate::patch::PatchList;
use crate::types::{
    BlockType, ByteRange, DuplicationResult, ProfileCounts, StructuredSegment, TableInfo,
    TemplateBlueprint,
};

fn segment_by_id<'a>(
    segments: &'a [StructuredSegment],
    id: &str,
) -> Option<&'a StructuredSegment> {
    segments.iter().find(|segment| segment.id == id)
}

fn span_of(ranges: impl Iterator<Item = ByteRange>) -> Option<ByteRange> {
    let mut span: Option<ByteRange> = None;
    for range in ranges {
        span = Some(match span {
            None => range,
            Some(acc) => ByteRange::new(acc.start.min(range.start), acc.end.max(range.end)),
        });
    }
    span
}

/// Byte range spanning one block instance: its first through last owned
/// table row, or first through last owned paragraph.
fn resolve_instance_span(
    block_type: BlockType,
    segments: &[StructuredSegment],
    tables: &[TableInfo],
    segment_ids: &[String],
) -> Option<ByteRange> {
    match block_type {
        BlockType::TableRows => span_of(segment_ids.iter().filter_map(|id| {
            let segment = segment_by_id(segments, id)?;
            let table = tables.get(segment.location.table_index?)?;
            let row = table.rows.get(segment.location.row_index?)?;
            Some(row.range)
        })),
        BlockType::ParagraphGroup => span_of(
            segment_ids
                .iter()
                .filter_map(|id| Some(segment_by_id(segments, id)?.location.paragraph)),
        ),
    }
}

/// Duplicate under-sized repeating blocks to match the profile counts.
///
/// `doc_xml` must be the snapshot the segments and tables were extracted
/// from. Blocks whose last instance cannot be resolved to a non-degenerate
/// range are skipped. Typical pipeline order is duplicate-first, then
/// re-extract, then fill, since duplication changes the fillable targets.
pub fn duplicate_blocks_in_xml(
    doc_xml: &str,
    blueprint: &TemplateBlueprint,
    segments: &[StructuredSegment],
    tables: &[TableInfo],
    profile_counts: &ProfileCounts,
) -> Result<DuplicationResult> {
    struct DupOp {
        insert_after: usize,
        block: ByteRange,
        count: usize,
        block_type: BlockType,
    }

    let mut ops: Vec<DupOp> = Vec::new();
    let mut details = Vec::new();

    for block in &blueprint.repeating_blocks {
        let Some(target) = profile_counts.target_for(&block.section_type) else {
            continue;
        };
        let current = block.instances.len();
        if current == 0 || target <= current {
            continue;
        }
        let last = &block.instances[current - 1];
        let Some(span) =
            resolve_instance_span(block.block_type, segments, tables, &last.segment_ids)
        else {
            warn!(
                "Could not resolve last {} instance of '{}', skipping block",
                block.block_type.as_str(),
                block.section_type
            );
            continue;
        };
        if span.is_empty() {
            continue;
        }
        let count = target - current;
        details.push(format!(
            "{}: duplicating {} {} ({} -> {})",
            block.section_type,
            count,
            block.block_type.as_str(),
            current,
            target
        ));
        ops.push(DupOp {
            insert_after: span.end,
            block: span,
            count,
            block_type: block.block_type,
        });
    }

    if ops.is_empty() {
        return Ok(DuplicationResult {
            xml: doc_xml.to_string(),
            duplicated: false,
            details,
        });
    }

    let mut patches = PatchList::new();
    for op in &ops {
        let block_xml = &doc_xml[op.block.start..op.block.end];
        let mut insertion = String::with_capacity((block_xml.len() + 11) * op.count);
        for _ in 0..op.count {
            if op.block_type == BlockType::ParagraphGroup {
                insertion.push_str("<w:p></w:p>");
            }
            insertion.push_str(block_xml);
        }
        patches.push(op.insert_after, op.insert_after, insertion);
    }

    info!("Duplicating {} repeating blocks", ops.len());
    let xml = patches.apply(doc_xml)?;
    Ok(DuplicationResult {
        xml,
        duplicated: true,
        details,
    })
}
