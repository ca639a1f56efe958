//! Fill application.
//!
//! Writes generated text back into the XML the segments were extracted from.
//! A filled merge-group leader implicitly blanks its followers, so the whole
//! logical value ends up in one run. Replacement elements keep the original
//! `<w:t …>` attributes and always carry `xml:space="preserve"`; inserted
//! text is entity-escaped, so the result stays well-formed regardless of
//! content.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::patch::PatchList;
use crate::types::StructuredSegment;
use crate::xml::{escape_text, preserved_attrs};

/// Apply a `segmentId → text` map to `doc_xml`, returning a new string.
///
/// `doc_xml` must be the exact `processed_xml` the segments were computed
/// from. An empty fill map is a no-op; fill IDs matching no known segment
/// are skipped silently.
pub fn apply_structured_fills(
    doc_xml: &str,
    fills: &HashMap<String, String>,
    segments: &[StructuredSegment],
    merge_groups: &HashMap<String, Vec<String>>,
) -> Result<String> {
    if fills.is_empty() {
        return Ok(doc_xml.to_string());
    }

    // Expand: every follower of a filled leader gets an empty fill unless
    // the caller already addressed it explicitly.
    let mut expanded: HashMap<&str, &str> = fills
        .iter()
        .map(|(id, text)| (id.as_str(), text.as_str()))
        .collect();
    for (leader, followers) in merge_groups {
        if !fills.contains_key(leader) {
            continue;
        }
        for follower in followers {
            expanded.entry(follower.as_str()).or_insert("");
        }
    }

    let mut patches = PatchList::new();
    for (id, new_text) in &expanded {
        let Some(segment) = segments.iter().find(|s| s.id == *id) else {
            debug!("Fill target {} matches no segment, skipping", id);
            continue;
        };
        let attrs = preserved_attrs(&segment.xml_text, "w:t");
        let replacement = format!("<w:t{attrs}>{}</w:t>", escape_text(new_text));
        patches.push(segment.start, segment.end, replacement);
    }

    debug!("Applying {} text fills", patches.len());
    patches.apply(doc_xml)
}
