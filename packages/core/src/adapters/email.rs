use super::{column_widths, format_percent, merged_styles, ContextAdapter, PLACEHOLDER_MARKER};
use crate::behaviors::{BlockContext, ChildLayout};
use crate::config::RenderConfig;
use crate::models::{BlockPath, ContextName};
use crate::services::collaborators::Translator;
use crate::services::renderer::RenderSession;
use crate::utils::html;

const TABLE_ATTRS: &str = "role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"";

/// Email output: every style inlined, no class attributes, containers as
/// presentation tables, a full document shell with Outlook conditionals.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailAdapter;

/// Comment text cannot contain `--` or `>`
fn comment_safe(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '/'))
        .collect()
}

impl ContextAdapter for EmailAdapter {
    fn context_name(&self) -> ContextName {
        ContextName::Email
    }

    fn element_attributes(&self, cx: &BlockContext<'_>, block_styles: &str) -> String {
        let merged = merged_styles(cx, block_styles);
        html::attributes(&[("style", merged.as_str())])
    }

    fn layout_children(&self, _cx: &BlockContext<'_>, children: Vec<String>, layout: &ChildLayout) -> String {
        match layout {
            ChildLayout::Columns { widths, gap } => {
                let widths = column_widths(widths, children.len());
                let half_gap = gap / 2;
                let cells: String = children
                    .iter()
                    .zip(&widths)
                    .map(|(child, width)| {
                        format!(
                            "<td width=\"{}%\" valign=\"top\" style=\"padding:0 {}px;vertical-align:top\">{}</td>",
                            format_percent(*width),
                            half_gap,
                            child
                        )
                    })
                    .collect();
                format!(
                    "<table {} width=\"100%\" style=\"border-collapse:collapse;table-layout:fixed\"><tr>{}</tr></table>",
                    TABLE_ATTRS, cells
                )
            }
            ChildLayout::Stack { gap } => {
                let last = children.len().saturating_sub(1);
                let rows: String = children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| {
                        let padding = if index == last { 0 } else { *gap };
                        format!("<tr><td style=\"padding:0 0 {}px 0\">{}</td></tr>", padding, child)
                    })
                    .collect();
                format!(
                    "<table {} width=\"100%\" style=\"border-collapse:collapse\">{}</table>",
                    TABLE_ATTRS, rows
                )
            }
        }
    }

    fn placeholder(
        &self,
        block_type: &str,
        path: &BlockPath,
        config: &RenderConfig,
        translator: &dyn Translator,
    ) -> String {
        let marker = format!(
            "<!--{} type={} path={}-->",
            PLACEHOLDER_MARKER,
            comment_safe(block_type),
            path
        );
        if config.visible_placeholders {
            format!(
                "{}<p style=\"margin:0;padding:8px;color:#6b7280;font-size:13px\">{}</p>",
                marker,
                html::text(&translator.translate("placeholder.unavailable"))
            )
        } else {
            marker
        }
    }

    fn wrap_output(&self, body: String, session: &RenderSession<'_>) -> String {
        let canvas = session.canvas();
        let width = canvas.width;

        let preheader = if canvas.preheader.is_empty() {
            String::new()
        } else {
            format!(
                "<div style=\"display:none;max-height:0;overflow:hidden;mso-hide:all\">{}</div>",
                html::text(&canvas.preheader)
            )
        };

        let mut out = String::with_capacity(body.len() + 2048);
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&format!(
            "<html lang=\"{}\" dir=\"{}\" xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:o=\"urn:schemas-microsoft-com:office:office\">\n",
            html::attr(&canvas.lang),
            html::attr(&canvas.direction)
        ));
        out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str("<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">\n");
        out.push_str(&format!("<title>{}</title>\n", html::text(&canvas.title)));
        out.push_str(
            "<!--[if mso]>\n<noscript><xml><o:OfficeDocumentSettings><o:AllowPNG/><o:PixelsPerInch>96</o:PixelsPerInch></o:OfficeDocumentSettings></xml></noscript>\n<![endif]-->\n",
        );
        out.push_str("</head>\n");
        out.push_str(&format!(
            "<body style=\"margin:0;padding:0;background-color:{};\">\n",
            html::attr(&canvas.background_color)
        ));
        out.push_str(&preheader);
        out.push_str(&format!(
            "<table {} width=\"100%\" style=\"background-color:{};\">\n<tr><td align=\"center\" style=\"padding:{};\">\n",
            TABLE_ATTRS,
            html::attr(&canvas.background_color),
            html::attr(&canvas.padding)
        ));
        out.push_str(&format!(
            "<!--[if mso | IE]><table {} width=\"{}\" align=\"center\"><tr><td><![endif]-->\n",
            TABLE_ATTRS, width
        ));
        out.push_str(&format!(
            "<div style=\"max-width:{}px;margin:0 auto;background-color:{};color:{};font-family:{};\">\n",
            width,
            html::attr(&canvas.content_background),
            html::attr(&canvas.text_color),
            html::attr(&canvas.font_family)
        ));
        out.push_str(&body);
        out.push_str("\n</div>\n<!--[if mso | IE]></td></tr></table><![endif]-->\n");
        out.push_str("</td></tr>\n</table>\n</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::collaborators::TableTranslator;

    #[test]
    fn test_placeholder_is_a_comment() {
        let out = EmailAdapter.placeholder(
            "car--ousel>",
            &BlockPath::root(3),
            &RenderConfig::default(),
            &TableTranslator::new(),
        );
        assert_eq!(out, "<!--lb-placeholder type=carousel path=3-->");
    }
}
