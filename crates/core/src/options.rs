//! Transform configuration.

use serde::Deserialize;

/// What to do with a `levels=` entry that has no template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLevelPolicy {
    /// Fail the document with [`crate::TabsError::UnknownLevel`].
    #[default]
    Error,
    /// Log a warning and leave the pane out.
    Skip,
}

/// Options for the config-tabs transform.
///
/// Deserializes from camelCase or snake_case keys; missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TabsOptions {
    /// Fenced code language that activates the transform (exact match).
    pub marker: String,
    /// Shared `groupId` so tab groups on one page switch together.
    #[serde(alias = "groupId")]
    pub group_id: String,
    /// Language set on the generated code blocks.
    #[serde(alias = "codeLang")]
    pub code_lang: String,
    /// Section name used for the model level when `model=` is absent.
    #[serde(alias = "defaultModel")]
    pub default_model: String,
    /// Section name used for the attribute level when `attribute=` is absent.
    #[serde(alias = "defaultAttribute")]
    pub default_attribute: String,
    /// Module specifier for the `Tabs` component.
    #[serde(alias = "tabsSource")]
    pub tabs_source: String,
    /// Module specifier for the `TabItem` component.
    #[serde(alias = "tabItemSource")]
    pub tab_item_source: String,
    /// Level selected when the page loads, if it is among the requested levels.
    #[serde(alias = "defaultLevel")]
    pub default_level: String,
    /// Handling of unrecognized level names.
    #[serde(alias = "unknownLevel")]
    pub unknown_level: UnknownLevelPolicy,
}

impl Default for TabsOptions {
    fn default() -> Self {
        Self {
            marker: "rhinoconfig".to_string(),
            group_id: "rhino-config".to_string(),
            code_lang: "javascript".to_string(),
            default_model: "blog".to_string(),
            default_attribute: "title".to_string(),
            tabs_source: "@theme/Tabs".to_string(),
            tab_item_source: "@theme/TabItem".to_string(),
            default_level: "model".to_string(),
            unknown_level: UnknownLevelPolicy::Error,
        }
    }
}
