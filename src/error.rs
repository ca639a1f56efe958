//! Error types for the segmentation and mutation pipeline.

/// Errors surfaced by the library.
///
/// Structurally incomplete templates never error: missing close tags,
/// unresolvable blocks and unknown fill IDs degrade per stage. Only
/// genuinely invalid input fails.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("document XML is empty")]
    EmptyDocument,

    #[error("overlapping edits: {0}..{1} collides with {2}..{3}")]
    OverlappingEdits(usize, usize, usize, usize),

    #[error("edit range {start}..{end} is out of bounds for a document of {len} bytes")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid blueprint JSON: {0}")]
    InvalidBlueprint(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
