use super::{column_widths, format_percent, merged_styles, ContextAdapter, PLACEHOLDER_MARKER};
use crate::behaviors::{BlockContext, ChildLayout};
use crate::config::RenderConfig;
use crate::models::{BlockPath, ContextName};
use crate::services::collaborators::Translator;
use crate::services::renderer::RenderSession;
use crate::utils::build_block_classes;
use crate::utils::html;

/// Web page output: class lists, a scoped `<style>` block, flex rows that
/// stack below the responsive breakpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAdapter;

impl ContextAdapter for PageAdapter {
    fn context_name(&self) -> ContextName {
        ContextName::Page
    }

    /// Classes always; when the block has styles, an `id` plus a rule in the
    /// canvas stylesheet instead of an inline `style`
    fn element_attributes(&self, cx: &BlockContext<'_>, block_styles: &str) -> String {
        let classes = build_block_classes(&cx.config().base_class, cx.block_type(), cx.props().as_map());
        let merged = merged_styles(cx, block_styles);
        if merged.is_empty() {
            return html::attributes(&[("class", classes.as_str())]);
        }

        let id = cx.path().dom_id();
        // `<` cannot appear in valid CSS and would let customCSS close the <style> tag
        cx.session().push_scoped_rule(format!("#{}{{{}}}", id, merged.replace('<', "")));
        html::attributes(&[("id", id.as_str()), ("class", classes.as_str())])
    }

    fn layout_children(&self, _cx: &BlockContext<'_>, children: Vec<String>, layout: &ChildLayout) -> String {
        match layout {
            ChildLayout::Columns { widths, gap } => {
                let widths = column_widths(widths, children.len());
                let columns: String = children
                    .iter()
                    .zip(&widths)
                    .map(|(child, width)| {
                        format!(
                            "<div class=\"lb-col\" style=\"flex:1 1 {}%;max-width:{}%;min-width:0\">{}</div>",
                            format_percent(*width),
                            format_percent(*width),
                            child
                        )
                    })
                    .collect();
                format!(
                    "<div class=\"lb-row\" style=\"display:flex;flex-wrap:nowrap;gap:{}px\">{}</div>",
                    gap, columns
                )
            }
            ChildLayout::Stack { gap } => format!(
                "<div class=\"lb-stack\" style=\"display:flex;flex-direction:column;gap:{}px\">{}</div>",
                gap,
                children.concat()
            ),
        }
    }

    fn placeholder(
        &self,
        block_type: &str,
        path: &BlockPath,
        config: &RenderConfig,
        translator: &dyn Translator,
    ) -> String {
        let path = path.to_string();
        let attrs = html::attributes(&[
            ("class", PLACEHOLDER_MARKER),
            ("data-block-type", block_type),
            ("data-block-path", path.as_str()),
        ]);
        if config.visible_placeholders {
            format!(
                "<div{}>{}</div>",
                attrs,
                html::text(&translator.translate("placeholder.unavailable"))
            )
        } else {
            format!("<div{} hidden></div>", attrs)
        }
    }

    fn wrap_output(&self, body: String, session: &RenderSession<'_>) -> String {
        let canvas = session.canvas();
        let config = session.config();

        let mut classes = String::from("lb-canvas");
        for token in canvas.container_class.split_whitespace() {
            classes.push(' ');
            classes.push_str(token);
        }
        let container_style = format!(
            "max-width:{};margin:0 auto;padding:{};background-color:{};color:{};font-family:{}",
            canvas.max_width,
            canvas.padding,
            canvas.content_background,
            canvas.text_color,
            canvas.font_family
        );

        let mut stylesheet = session.scoped_rules().concat();
        if body.contains("class=\"lb-row\"") {
            stylesheet.push_str(&format!(
                "@media (max-width:{}px){{.lb-row{{flex-direction:column}}.lb-col{{max-width:100%!important}}}}",
                config.responsive_breakpoint
            ));
        }
        let style_block = if stylesheet.is_empty() {
            String::new()
        } else {
            format!("<style>{}</style>", stylesheet)
        };

        format!(
            "<section{}>{}{}</section>",
            html::attributes(&[
                ("class", classes.as_str()),
                ("lang", canvas.lang.as_str()),
                ("dir", canvas.direction.as_str()),
                ("style", container_style.as_str()),
            ]),
            style_block,
            body
        )
    }
}
