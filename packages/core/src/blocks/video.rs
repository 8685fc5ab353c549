use super::has_media;
use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType};
use crate::services::{BlockError, RegistryError};
use crate::utils::html;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoProps {
    /// Media id or URL of the video file
    pub src: Value,
    /// Media id or URL of the thumbnail
    pub poster: Value,
    pub autoplay: bool,
    pub controls: bool,
    pub caption: String,
}

impl Default for VideoProps {
    fn default() -> Self {
        Self {
            src: json!(""),
            poster: json!(""),
            autoplay: false,
            controls: true,
            caption: String::new(),
        }
    }
}

/// Video player on pages; a linked thumbnail in email, where video cannot play
pub struct VideoBlock;

impl VideoBlock {
    fn props(cx: &BlockContext<'_>) -> Result<VideoProps, BlockError> {
        let props: VideoProps = cx.decode_props()?;
        if !has_media(&props.src) {
            return Err(BlockError::failed("video has no source"));
        }
        Ok(props)
    }

    fn caption(props: &VideoProps, styles: &str) -> String {
        if props.caption.trim().is_empty() {
            return String::new();
        }
        let style = if styles.is_empty() {
            String::new()
        } else {
            format!(" style=\"{styles}\"")
        };
        format!("<figcaption{style}>{}</figcaption>", html::text(&props.caption))
    }
}

impl BlockRenderer for VideoBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props = Self::props(cx)?;
        let src = cx.media_url(&props.src);

        let mut attrs = format!(" src=\"{}\" preload=\"metadata\"", html::safe_url(&src));
        if has_media(&props.poster) {
            attrs.push_str(&format!(" poster=\"{}\"", html::safe_url(&cx.media_url(&props.poster))));
        }
        if props.controls {
            attrs.push_str(" controls");
        }
        if props.autoplay {
            attrs.push_str(" autoplay muted playsinline");
        }

        Ok(format!(
            "<figure{}><video{} style=\"width:100%;height:auto\">{}</video>{}</figure>",
            cx.element_attributes("margin:0"),
            attrs,
            html::text(&cx.translate("video.unsupported")),
            Self::caption(&props, "")
        ))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props = Self::props(cx)?;
        let href = html::safe_url(&cx.media_url(&props.src)).into_owned();
        let label = cx.translate("video.play");

        let inner = if has_media(&props.poster) {
            format!(
                "<img src=\"{}\" alt=\"{}\" width=\"{}\" style=\"display:block;max-width:100%;height:auto;border:0\">",
                html::safe_url(&cx.media_url(&props.poster)),
                html::attr(&label),
                cx.canvas().width
            )
        } else {
            format!(
                "<span style=\"display:inline-block;padding:12px 24px;background-color:#111827;color:#ffffff;font-weight:bold\">&#9654; {}</span>",
                html::text(&label)
            )
        };

        Ok(format!(
            "<div{}><a href=\"{}\" style=\"text-decoration:none\">{}</a>{}</div>",
            cx.element_attributes(""),
            href,
            inner,
            Self::caption(&props, "margin:8px 0 0 0;font-size:13px;color:#6b7280")
        ))
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("video", VideoBlock)
        .prop("src", PropType::Any, json!(""))
        .prop("poster", PropType::Any, json!(""))
        .prop("autoplay", PropType::Boolean, json!(false))
        .prop("controls", PropType::Boolean, json!(true))
        .prop("caption", PropType::String, json!(""))
        .build()
}

#[cfg(test)]
mod tests {
    use crate::blocks::test_support::render_node;
    use serde_json::json;

    fn video() -> serde_json::Value {
        json!({"type": "video", "props": {"src": "https://cdn.test/clip.mp4", "poster": 9, "caption": "Demo"}})
    }

    #[test]
    fn test_page_video_is_native() {
        let out = render_node(video(), "page");
        assert!(out.html.contains(
            "<video src=\"https://cdn.test/clip.mp4\" preload=\"metadata\" poster=\"/storage/media/9\" controls"
        ));
        assert!(out.html.contains("<figcaption>Demo</figcaption>"));
    }

    #[test]
    fn test_email_video_is_linked_thumbnail() {
        let out = render_node(video(), "email");
        assert!(!out.html.contains("<video"));
        assert!(out.html.contains(
            "<a href=\"https://cdn.test/clip.mp4\" style=\"text-decoration:none\"><img src=\"/storage/media/9\" alt=\"Play video\""
        ));
    }
}
