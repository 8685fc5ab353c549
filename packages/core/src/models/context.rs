//! Render Contexts
//!
//! A render context names the output target and the feature set derived from
//! it. The feature set comes from a fixed mapping:
//!
//! | context  | features                                                      |
//! |----------|---------------------------------------------------------------|
//! | page     | css classes, native video, responsive layout                  |
//! | email    | inline styles, tables, mail-client conditionals               |
//! | campaign | email features + personalization tokens                       |

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown render context '{0}' (expected page, email or campaign)")]
pub struct UnknownContextError(pub String);

/// Output target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextName {
    Page,
    Email,
    Campaign,
}

impl ContextName {
    pub const ALL: [ContextName; 3] = [ContextName::Page, ContextName::Email, ContextName::Campaign];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextName::Page => "page",
            ContextName::Email => "email",
            ContextName::Campaign => "campaign",
        }
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextName {
    type Err = UnknownContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" => Ok(ContextName::Page),
            "email" => Ok(ContextName::Email),
            "campaign" => Ok(ContextName::Campaign),
            _ => Err(UnknownContextError(s.to_string())),
        }
    }
}

/// Rendering capability of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CssClasses,
    NativeVideo,
    ResponsiveLayout,
    InlineStyles,
    Tables,
    MsoConditionals,
    Personalization,
}

/// Value object describing the current output target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub name: ContextName,
    pub features: BTreeSet<Feature>,
}

impl RenderContext {
    pub fn new(name: ContextName) -> Self {
        let features: &[Feature] = match name {
            ContextName::Page => &[
                Feature::CssClasses,
                Feature::NativeVideo,
                Feature::ResponsiveLayout,
            ],
            ContextName::Email => &[
                Feature::InlineStyles,
                Feature::Tables,
                Feature::MsoConditionals,
            ],
            ContextName::Campaign => &[
                Feature::InlineStyles,
                Feature::Tables,
                Feature::MsoConditionals,
                Feature::Personalization,
            ],
        };

        Self {
            name,
            features: features.iter().copied().collect(),
        }
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Email and campaign both render with inline styles and tables
    pub fn is_email_like(&self) -> bool {
        self.supports(Feature::InlineStyles)
    }
}

impl FromStr for RenderContext {
    type Err = UnknownContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_names() {
        assert_eq!("page".parse::<ContextName>().unwrap(), ContextName::Page);
        assert_eq!(" Email ".parse::<ContextName>().unwrap(), ContextName::Email);
        assert_eq!("campaign".parse::<ContextName>().unwrap(), ContextName::Campaign);

        let err = "sms".parse::<ContextName>().unwrap_err();
        assert!(err.to_string().contains("'sms'"));
    }

    #[test]
    fn test_feature_mapping() {
        let page = RenderContext::new(ContextName::Page);
        assert!(page.supports(Feature::CssClasses));
        assert!(page.supports(Feature::NativeVideo));
        assert!(!page.supports(Feature::InlineStyles));

        let email = RenderContext::new(ContextName::Email);
        assert!(email.supports(Feature::MsoConditionals));
        assert!(!email.supports(Feature::Personalization));

        let campaign = RenderContext::new(ContextName::Campaign);
        assert!(campaign.is_email_like());
        assert!(campaign.supports(Feature::Personalization));
        assert!(email.features.is_subset(&campaign.features));
    }
}
