//! Rendering benchmarks for LaraBuilder core
//!
//! Run with: `cargo bench -p larabuilder-core`
//!
//! These benchmarks measure the hot paths of a render:
//! - Full-document render per context (migration, tree walk, wrapping)
//! - Migration of legacy documents compared to current ones
//! - Filter chain dispatch overhead

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use larabuilder_core::blocks::register_core_blocks;
use larabuilder_core::hooks::names;
use larabuilder_core::{BlockRegistry, Document, HookArgs, HookDispatcher, Renderer};
use serde_json::{json, Value};
use std::sync::Arc;

fn setup_renderer(hooks: HookDispatcher) -> Renderer {
    let mut registry = BlockRegistry::new();
    register_core_blocks(&mut registry).unwrap();
    Renderer::new(Arc::new(registry), Arc::new(hooks))
}

/// Build a document with `sections` repetitions of a heading, a paragraph,
/// a two-column row and a button. `version` is the schema version stamped
/// on the heading and button nodes.
fn generate_document(sections: usize, version: u32) -> Document {
    let mut blocks = Vec::with_capacity(sections * 4);
    for i in 0..sections {
        let (heading, button): (Value, Value) = if version == 1 {
            (
                json!({"type": "heading", "props": {"size": 2, "text": format!("Section {}", i + 1)}}),
                json!({"type": "button", "props": {"text": "Read more", "link": "/post", "style": "outline"}}),
            )
        } else {
            (
                json!({"type": "heading", "version": 2, "props": {"level": 2, "text": format!("Section {}", i + 1)}}),
                json!({"type": "button", "version": 3, "props": {"text": "Read more", "url": "/post", "variant": "outline"}}),
            )
        };
        blocks.push(heading);
        blocks.push(json!({"type": "text", "props": {
            "content": format!("Paragraph {} with **bold** text and a [link](https://example.com).", i + 1),
            "format": "markdown",
            "layoutStyles": {"padding": {"top": 8, "bottom": 8}}
        }}));
        blocks.push(json!({"type": "columns", "props": {"widths": [60, 40]}, "children": [
            {"type": "text", "props": {"content": "<p>Left</p>"}},
            {"type": "image", "props": {"src": i, "alt": "Figure"}}
        ]}));
        blocks.push(button);
    }

    Document::from_value(json!({
        "canvasSettings": {"width": 640, "backgroundColor": "#f3f4f6"},
        "blocks": blocks
    }))
    .unwrap()
}

fn bench_full_render(c: &mut Criterion) {
    let renderer = setup_renderer(HookDispatcher::new());
    let document = generate_document(50, 3);

    let mut group = c.benchmark_group("render_200_blocks");
    for context in ["page", "email", "campaign"] {
        group.bench_function(context, |b| {
            b.iter(|| renderer.render(black_box(&document), context).unwrap())
        });
    }
    group.finish();
}

fn bench_migration(c: &mut Criterion) {
    let renderer = setup_renderer(HookDispatcher::new());
    let legacy = generate_document(50, 1);
    let current = generate_document(50, 3);

    let mut group = c.benchmark_group("migration");
    group.sample_size(50);

    group.bench_function("legacy_document", |b| {
        b.iter(|| renderer.render(black_box(&legacy), "email").unwrap())
    });

    group.bench_function("current_document", |b| {
        b.iter(|| renderer.render(black_box(&current), "email").unwrap())
    });

    group.finish();
}

fn bench_filter_chain(c: &mut Criterion) {
    let mut hooks = HookDispatcher::new();
    for priority in 0..10 {
        hooks.add_filter(names::HTML_BLOCK, priority, |html: String, _: &HookArgs<'_>| Ok(html));
    }
    let args = HookArgs::default();

    c.bench_function("apply_10_filters", |b| {
        b.iter(|| {
            hooks
                .apply_filters(names::HTML_BLOCK, black_box(String::from("<p>x</p>")), &args)
                .unwrap()
        })
    });

    let renderer = setup_renderer(hooks);
    let document = generate_document(10, 3);
    c.bench_function("render_with_block_filters", |b| {
        b.iter(|| renderer.render(black_box(&document), "page").unwrap())
    });
}

criterion_group!(benches, bench_full_render, bench_migration, bench_filter_chain);
criterion_main!(benches);
