//! Escaping helpers for generated markup.

/// Escape text for use inside a double-quoted HTML attribute.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a string as a JavaScript literal safe to embed in a `<script>` block.
#[must_use]
pub fn script_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
