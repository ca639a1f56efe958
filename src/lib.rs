//! Structure-aware segmentation and mutation engine for OOXML
//! `document.xml` bodies.
//!
//! The pipeline for one document:
//! - [`extract_structured_segments`]: locate every editable text run with
//!   its structural context (body vs. table/row/cell/paragraph), merge-group
//!   fragmented body runs, and render the template map handed to the
//!   external content-generation step.
//! - [`duplicate_blocks_in_xml`]: clone repeating blocks (table rows or
//!   paragraph groups) to match target instance counts.
//! - [`apply_structured_fills`]: write generated `segmentId → text` values
//!   back into the XML.
//!
//! Each stage is a pure string transformation over the snapshot the previous
//! stage produced; byte offsets are only valid against the exact string they
//! were computed from, so a single document's stages must run in order.
//! Package (zip) I/O, rendering and content generation are external.

pub mod duplicate;
pub mod error;
pub mod extract;
pub mod fill;
pub mod locator;
pub mod merge;
pub mod patch;
pub mod placeholder;
pub mod template_map;
pub mod types;
pub mod xml;

pub use duplicate::duplicate_blocks_in_xml;
pub use error::{Result, SegmentError};
pub use extract::extract_structured_segments;
pub use fill::apply_structured_fills;
pub use types::{
    BlockInstance, BlockType, ByteRange, DuplicationResult, ExtractionResult, ProfileCounts,
    RepeatingBlock, SegmentContext, SegmentLocation, StructuredSegment, TableCellInfo, TableInfo,
    TableRowInfo, TemplateBlueprint,
};
