//! Campaign personalization tokens
//!
//! Tokens look like `{{ first_name }}` or `{{ first_name | there }}`. A token
//! whose key has a value is replaced with the escaped value; otherwise the
//! fallback after `|` is used, or nothing.
//!
//! Tokens can sit inside attribute values (`href="/?n={{ name }}"`), so
//! replacements are escaped for a double-quoted attribute, which is also
//! safe in text content.

use crate::utils::html;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `{{ key }}` / `{{ key | fallback }}`
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*(?:\|\s*([^}]*?)\s*)?\}\}").unwrap()
});

/// Replace every personalization token in `html`
pub fn substitute_tokens(html: &str, values: &BTreeMap<String, String>) -> String {
    TOKEN_RE
        .replace_all(html, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            match values.get(key).filter(|v| !v.is_empty()) {
                Some(value) => html::attr(value).into_owned(),
                None => caps
                    .get(2)
                    .map(|fallback| html::attr(fallback.as_str()).into_owned())
                    .unwrap_or_default(),
            }
        })
        .into_owned()
}

/// Keys referenced by tokens in `html`, in first-seen order
pub fn token_keys(html: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in TOKEN_RE.captures_iter(html) {
        let key = caps[1].to_string();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_substitutes_known_tokens() {
        let out = substitute_tokens("<p>Hi {{ first_name }}!</p>", &values(&[("first_name", "Ada")]));
        assert_eq!(out, "<p>Hi Ada!</p>");
    }

    #[test]
    fn test_fallback_and_missing() {
        let out = substitute_tokens("Hi {{name|there}}, {{ code }}.", &values(&[]));
        assert_eq!(out, "Hi there, .");
    }

    #[test]
    fn test_values_are_escaped() {
        let out = substitute_tokens("{{ name }}", &values(&[("name", "<script>")]));
        assert_eq!(out, "&lt;script&gt;");
    }

    #[test]
    fn test_quotes_cannot_leave_an_attribute() {
        let out = substitute_tokens(
            "<a href=\"https://x.test/?n={{ name }}\">Go</a>",
            &values(&[("name", "\" onmouseover=\"alert(1)")]),
        );
        assert_eq!(out, "<a href=\"https://x.test/?n=&quot; onmouseover=&quot;alert(1)\">Go</a>");

        let out = substitute_tokens("<a title=\"{{ who | \"x\" }}\">", &values(&[]));
        assert!(!out.contains("\"x\""));
    }

    #[test]
    fn test_token_keys_unique_in_order() {
        assert_eq!(
            token_keys("{{ b }} {{a|x}} {{ b }}"),
            vec!["b".to_string(), "a".to_string()]
        );
    }
}
