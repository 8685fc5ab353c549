//! HTML escaping and attribute helpers

use std::borrow::Cow;

/// Escape text content
pub fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escape a double-quoted attribute value
pub fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Render ` name="value"` pairs, skipping empty values
pub fn attributes(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!(" {}=\"{}\"", name, attr(value)))
        .collect()
}

/// Only allow link targets with a safe scheme; anything else becomes `#`
pub fn safe_url(url: &str) -> Cow<'_, str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let scheme_ok = ["http://", "https://", "mailto:", "tel:", "/", "#", "?"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
        || !lower.contains(':');

    if trimmed.is_empty() || !scheme_ok {
        Cow::Borrowed("#")
    } else {
        attr(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_attr_escaping() {
        assert_eq!(text("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_attributes_skip_empty() {
        assert_eq!(
            attributes(&[("class", "a b"), ("style", ""), ("alt", "x")]),
            " class=\"a b\" alt=\"x\""
        );
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(safe_url("https://example.com/?a=1"), "https://example.com/?a=1");
        assert_eq!(safe_url("/pricing"), "/pricing");
        assert_eq!(safe_url("contact.html"), "contact.html");
        assert_eq!(safe_url("javascript:alert(1)"), "#");
        assert_eq!(safe_url(""), "#");
    }
}
