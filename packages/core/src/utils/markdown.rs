//! Text conversion for text blocks
//!
//! Text blocks store their body in one of three formats:
//!
//! - `html` - editor output, emitted as-is
//! - `markdown` - converted with pulldown-cmark
//! - `plain` - escaped, line breaks kept

use pulldown_cmark::{html, Options, Parser};

/// Convert markdown to HTML (tables, strikethrough and task lists enabled)
pub fn markdown_to_html(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);
    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

/// Escape plain text and turn newlines into `<br>`
pub fn plain_to_html(content: &str) -> String {
    content
        .lines()
        .map(|line| crate::utils::html::text(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Render a text body in the given format (unknown formats are treated as html)
pub fn render_text(content: &str, format: &str) -> String {
    match format {
        "markdown" | "md" => markdown_to_html(content),
        "plain" | "text" => plain_to_html(content),
        _ => content.to_string(),
    }
}
