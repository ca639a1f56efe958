//! Small helpers for working with raw OOXML text nodes.

/// Escape text for insertion into XML content or attribute values.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode the five predefined XML entities back into visible text.
pub fn decode_text(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Inner text of a raw `<w:t …>…</w:t>` element, entity-decoded.
/// Self-closing and empty elements yield `""`.
pub fn text_element_content(element: &str) -> String {
    let Some(gt) = element.find('>') else {
        return String::new();
    };
    if element.as_bytes()[gt - 1] == b'/' {
        return String::new();
    }
    let Some(close) = element.rfind("</") else {
        return String::new();
    };
    if close <= gt {
        return String::new();
    }
    decode_text(&element[gt + 1..close])
}

/// Attribute string of the open tag of a raw `<w:t …>` element, with
/// `xml:space` forced to `preserve`. Returns e.g. ` xml:space="preserve"`.
///
/// An existing `xml:space="default"` is rewritten, not kept: filled text may
/// start or end with spaces, and Word collapses those under `default`.
pub fn preserved_attrs(element: &str, tag: &str) -> String {
    let mut attrs = String::new();
    if let Some(gt) = element.find('>') {
        let open = &element[..gt];
        if let Some(rest) = open.strip_prefix('<').and_then(|s| s.strip_prefix(tag)) {
            attrs = rest.trim_end_matches('/').trim_end().to_string();
        }
    }
    const SPACE_ATTR: &str = "xml:space=\"";
    if let Some(at) = attrs.find(SPACE_ATTR) {
        let value_start = at + SPACE_ATTR.len();
        if let Some(rel) = attrs[value_start..].find('"') {
            attrs.replace_range(value_start..value_start + rel, "preserve");
            return attrs;
        }
    }
    attrs.push_str(" xml:space=\"preserve\"");
    attrs
}
