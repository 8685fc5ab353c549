/// Configuration for the rendering pipeline
use crate::hooks::HookErrorPolicy;
use serde::{Deserialize, Serialize};

/// Widest email body mail clients handle reliably
const MAX_SUPPORTED_EMAIL_WIDTH: u32 = 1200;

/// Renderer configuration, usually loaded once at boot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// What the hook dispatcher does with failing callbacks
    pub hook_error_policy: HookErrorPolicy,

    /// First class on every page block
    pub base_class: String,

    /// Email width when the canvas does not set one
    pub default_email_width: u32,

    /// Upper bound for the canvas email width
    pub max_email_width: u32,

    /// Page container max width when the canvas does not set one
    pub page_max_width: String,

    /// Columns stack below this viewport width on pages (px)
    pub responsive_breakpoint: u32,

    /// Prefix for numeric media ids in the default media resolver
    pub media_base_url: String,

    /// Render placeholders as visible notices instead of empty marked elements
    pub visible_placeholders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hook_error_policy: HookErrorPolicy::Isolate,
            base_class: "lb-block".to_string(),
            default_email_width: 600,
            max_email_width: MAX_SUPPORTED_EMAIL_WIDTH,
            page_max_width: "1200px".to_string(),
            responsive_breakpoint: 640,
            media_base_url: "/storage/media".to_string(),
            visible_placeholders: false,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON configuration; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_class.trim().is_empty() {
            return Err("base_class cannot be empty".to_string());
        }

        if self.default_email_width == 0 {
            return Err("default_email_width must be greater than 0".to_string());
        }

        if self.max_email_width > MAX_SUPPORTED_EMAIL_WIDTH {
            return Err(format!(
                "max_email_width cannot exceed {}",
                MAX_SUPPORTED_EMAIL_WIDTH
            ));
        }

        if self.default_email_width > self.max_email_width {
            return Err("default_email_width cannot exceed max_email_width".to_string());
        }

        if self.responsive_breakpoint == 0 {
            return Err("responsive_breakpoint must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.hook_error_policy, HookErrorPolicy::Isolate);
        assert_eq!(config.base_class, "lb-block");
        assert_eq!(config.default_email_width, 600);
        assert!(!config.visible_placeholders);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RenderConfig::default();

        // Invalid: empty base class
        config.base_class = " ".to_string();
        assert!(config.validate().is_err());

        // Invalid: zero email width
        config.base_class = "lb-block".to_string();
        config.default_email_width = 0;
        assert!(config.validate().is_err());

        // Invalid: default wider than max
        config.default_email_width = 800;
        config.max_email_width = 700;
        assert!(config.validate().is_err());

        // Invalid: max above supported width
        config.max_email_width = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json_str(r#"{"hook_error_policy": "propagate"}"#).unwrap();
        assert_eq!(config.hook_error_policy, HookErrorPolicy::Propagate);
        assert_eq!(config.default_email_width, 600);
    }
}
