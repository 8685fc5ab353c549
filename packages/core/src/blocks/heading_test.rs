use super::*;
use crate::blocks::test_support::render_node;
use crate::services::DiagnosticKind;

#[test]
fn test_page_heading() {
    let out = render_node(
        json!({"type": "heading", "version": 2, "props": {"text": "Hello & welcome", "level": 1}}),
        "page",
    );
    assert!(out.html.contains("<h1 class=\"lb-block block-heading\">Hello &amp; welcome</h1>"));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_level_is_clamped() {
    let out = render_node(
        json!({"type": "heading", "version": 2, "props": {"text": "x", "level": 9}}),
        "page",
    );
    assert!(out.html.contains("<h6"));
}

#[test]
fn test_oversized_level_is_clamped() {
    let out = render_node(
        json!({"type": "heading", "version": 2, "props": {"text": "x", "level": 18446744073709551615u64}}),
        "email",
    );
    assert!(out.diagnostics.is_empty());
    assert!(out.html.contains("<h6 style=\"margin:0;font-size:14px;"));
}

#[test]
fn test_v1_size_migrates_to_level() {
    let out = render_node(
        json!({"type": "heading", "props": {"text": "Legacy", "size": "h3"}}),
        "page",
    );
    assert!(out.html.contains("<h3"));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_unreadable_size_renders_best_effort() {
    let out = render_node(
        json!({"type": "heading", "props": {"text": "Legacy", "size": "huge"}}),
        "page",
    );
    // Migration stops at v1; level falls back to the schema default
    assert!(out.html.contains("<h2"));
    assert_eq!(
        out.diagnostics[0].kind,
        DiagnosticKind::MigrationIncomplete { reached: 1, target: 2 }
    );
}

#[test]
fn test_email_heading_inlines_styles() {
    let out = render_node(
        json!({"type": "heading", "version": 2, "props": {"text": "Hi", "level": 1, "color": "#111"}}),
        "email",
    );
    assert!(out
        .html
        .contains("<h1 style=\"margin:0;font-size:32px;line-height:1.3;font-weight:bold;color:#111\">Hi</h1>"));
}

#[test]
fn test_size_to_level_keeps_explicit_level() {
    let props = json!({"size": 4, "level": 1}).as_object().cloned().unwrap();
    let migrated = size_to_level(&props).unwrap();
    assert_eq!(migrated["level"], 1);
    assert!(!migrated.contains_key("size"));
}
