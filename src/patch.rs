//! Reverse-offset batch mutation.
//!
//! Every mutation stage follows the same rule: compute all edits against one
//! fixed snapshot, collect them as non-overlapping `(start, end, replacement)`
//! triples, then apply them in strictly descending start order so earlier
//! offsets are never invalidated by later replacements. `PatchList` is that
//! rule, factored out; the placeholder injector, the fill applicator and the
//! block duplicator all go through it.

use crate::error::{Result, SegmentError};

/// One pending edit. `start == end` is a pure insertion.
#[derive(Debug, Clone)]
pub struct Patch {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// An unordered batch of edits against one XML snapshot.
#[derive(Debug, Default)]
pub struct PatchList {
    patches: Vec<Patch>,
}

impl PatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, start: usize, end: usize, replacement: impl Into<String>) {
        self.patches.push(Patch {
            start,
            end,
            replacement: replacement.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Apply the batch to `xml`, returning the mutated string.
    ///
    /// Validates bounds and non-overlap (touching ranges are fine), sorts
    /// descending by start, then applies sequentially.
    pub fn apply(mut self, xml: &str) -> Result<String> {
        for patch in &self.patches {
            if patch.start > patch.end || patch.end > xml.len() {
                return Err(SegmentError::EditOutOfBounds {
                    start: patch.start,
                    end: patch.end,
                    len: xml.len(),
                });
            }
        }
        self.patches.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
        for pair in self.patches.windows(2) {
            // pair[0] sits at the higher offset after the descending sort.
            if pair[1].end > pair[0].start {
                return Err(SegmentError::OverlappingEdits(
                    pair[1].start,
                    pair[1].end,
                    pair[0].start,
                    pair[0].end,
                ));
            }
        }
        let mut out = xml.to_string();
        for patch in &self.patches {
            out.replace_range(patch.start..patch.end, &patch.replacement);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_application_preserves_offsets() {
        let mut patches = PatchList::new();
        // Pushed in ascending order on purpose.
        patches.push(0, 1, "AA");
        patches.push(2, 3, "BB");
        patches.push(4, 5, "CC");
        assert_eq!(patches.apply("a b c").unwrap(), "AA BB CC");
    }

    #[test]
    fn test_insertion_is_zero_width() {
        let mut patches = PatchList::new();
        patches.push(5, 5, "-tail");
        patches.push(0, 0, "head-");
        assert_eq!(patches.apply("BLOCK").unwrap(), "head-BLOCK-tail");
    }

    #[test]
    fn test_touching_ranges_are_allowed() {
        let mut patches = PatchList::new();
        patches.push(0, 2, "xx");
        patches.push(2, 4, "yy");
        assert_eq!(patches.apply("abcd").unwrap(), "xxyy");
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut patches = PatchList::new();
        patches.push(0, 3, "x");
        patches.push(2, 4, "y");
        assert!(matches!(
            patches.apply("abcd"),
            Err(SegmentError::OverlappingEdits(..))
        ));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut patches = PatchList::new();
        patches.push(0, 10, "x");
        assert!(matches!(
            patches.apply("abc"),
            Err(SegmentError::EditOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let patches = PatchList::new();
        assert_eq!(patches.apply("unchanged").unwrap(), "unchanged");
    }
}
