//! Data model for structured segmentation of an OOXML document body.
//!
//! Byte offsets throughout refer to the *processed* XML snapshot produced by
//! [`crate::extract_structured_segments`] (placeholder injection already
//! applied), never to the caller's original string. Offsets are only valid
//! against the exact string they were computed from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Half-open byte range `[start, end)` into a specific XML snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether a byte position falls inside this range.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Where a segment lives in the document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentContext {
    Body,
    Table,
}

/// Structural context attached to every segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLocation {
    pub context: SegmentContext,
    /// 0-based table index; `None` for body segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_index: Option<usize>,
    /// Enclosing paragraph range. Invariant:
    /// `paragraph.start <= segment.start < segment.end <= paragraph.end`.
    pub paragraph: ByteRange,
    /// Enclosing `<w:tr>` range; table segments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_row: Option<ByteRange>,
}

/// One extracted `<w:t>` occurrence plus its structural location.
///
/// `id` is stable only after the extraction pass has sorted all segments by
/// `start` and assigned sequential IDs (`s0`, `s1`, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSegment {
    pub id: String,
    /// Decoded visible text of the run.
    pub text: String,
    /// Raw matched `<w:t …>…</w:t>` element.
    pub xml_text: String,
    pub start: usize,
    pub end: usize,
    pub location: SegmentLocation,
}

impl StructuredSegment {
    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.start, self.end)
    }
}

/// A table cell: its range, concatenated visible text and the segment IDs it
/// owns, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellInfo {
    pub range: ByteRange,
    pub text: String,
    pub segment_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowInfo {
    pub range: ByteRange,
    pub cells: Vec<TableCellInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub range: ByteRange,
    pub rows: Vec<TableRowInfo>,
}

/// Everything one extraction pass produces.
///
/// Immutable once returned; the fill and duplication stages consume it and
/// return new strings. `processed_xml` — not the caller's original input —
/// is the authoritative byte-offset space for every later stage of the same
/// pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub segments: Vec<StructuredSegment>,
    pub tables: Vec<TableInfo>,
    /// Compact textual rendering handed to the external generation step.
    pub template_map: String,
    pub processed_xml: String,
    /// Leader segment ID → follower segment IDs (body paragraphs only).
    pub merge_groups: HashMap<String, Vec<String>>,
}

/// Kind of structural block a repeating section is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    TableRows,
    ParagraphGroup,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::TableRows => "table_rows",
            BlockType::ParagraphGroup => "paragraph_group",
        }
    }
}

/// One repetition of a repeating block: the segment IDs belonging to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInstance {
    pub segment_ids: Vec<String>,
}

/// A repeating region of the template, as identified by the external
/// analysis step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatingBlock {
    /// Semantic section, e.g. `work_experience` or `education`.
    pub section_type: String,
    pub block_type: BlockType,
    /// Instances currently present in the template, in document order.
    pub instances: Vec<BlockInstance>,
}

/// Externally produced description of which blocks in the template repeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBlueprint {
    pub repeating_blocks: Vec<RepeatingBlock>,
}

impl TemplateBlueprint {
    /// Parse the blueprint JSON produced by the external analysis step.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Desired instance counts per semantic section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCounts {
    pub work_experience: usize,
    pub education: usize,
}

impl ProfileCounts {
    /// Target count for a blueprint section type, if we track one.
    /// Unknown section types have no target and are skipped.
    pub fn target_for(&self, section_type: &str) -> Option<usize> {
        match section_type {
            "work_experience" => Some(self.work_experience),
            "education" => Some(self.education),
            _ => None,
        }
    }
}

/// Outcome of a duplication pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicationResult {
    pub xml: String,
    pub duplicated: bool,
    /// One human-readable line per duplicated block.
    pub details: Vec<String>,
}
