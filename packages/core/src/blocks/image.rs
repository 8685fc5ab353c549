use super::has_media;
use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{lenient, BlockDefinition, PropType};
use crate::services::{BlockError, RegistryError};
use crate::utils::html;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageProps {
    /// Media id or URL
    pub src: Value,
    pub alt: String,
    pub link: String,
    /// Display width in pixels; 0 or less means full width
    #[serde(deserialize_with = "lenient::int")]
    pub width: i64,
}

impl ImageProps {
    /// Width in pixels, 0 for full width
    pub fn width(&self) -> u32 {
        u32::try_from(self.width.max(0)).unwrap_or(u32::MAX)
    }
}

pub struct ImageBlock;

impl ImageBlock {
    fn resolve(cx: &BlockContext<'_>) -> Result<(ImageProps, String, String), BlockError> {
        let props: ImageProps = cx.decode_props()?;
        if !has_media(&props.src) {
            return Err(BlockError::failed("image has no source"));
        }
        let url = cx.media_url(&props.src);
        let alt = if props.alt.trim().is_empty() {
            cx.translate("image.missing")
        } else {
            props.alt.clone()
        };
        Ok((props, url, alt))
    }

    fn linked(link: &str, inner: String) -> String {
        if link.trim().is_empty() {
            inner
        } else {
            format!("<a href=\"{}\">{}</a>", html::safe_url(link), inner)
        }
    }
}

impl BlockRenderer for ImageBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let (props, url, alt) = Self::resolve(cx)?;
        let width = if props.width() > 0 {
            format!(" width=\"{}\"", props.width())
        } else {
            String::new()
        };
        let img = format!(
            "<img src=\"{}\" alt=\"{}\"{} loading=\"lazy\" style=\"max-width:100%;height:auto\">",
            html::safe_url(&url),
            html::attr(&alt),
            width
        );
        Ok(format!(
            "<figure{}>{}</figure>",
            cx.element_attributes("margin:0"),
            Self::linked(&props.link, img)
        ))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let (props, url, alt) = Self::resolve(cx)?;
        let width = if props.width() > 0 {
            props.width().min(cx.canvas().width)
        } else {
            cx.canvas().width
        };
        let img = format!(
            "<img src=\"{}\" alt=\"{}\" width=\"{}\"{}>",
            html::safe_url(&url),
            html::attr(&alt),
            width,
            cx.element_attributes("display:block;max-width:100%;height:auto;border:0;outline:none")
        );
        Ok(Self::linked(&props.link, img))
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("image", ImageBlock)
        .prop("src", PropType::Any, json!(""))
        .prop("alt", PropType::String, json!(""))
        .prop("link", PropType::String, json!(""))
        .prop("width", PropType::Integer, json!(0))
        .build()
}
