use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("templateConfig.maxBlocks must be greater than zero")]
    ZeroMaxBlocks,

    #[error("templateConfig.chunkSize must be greater than zero")]
    ZeroChunkSize,

    #[error("invalid widget config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Slash menu filtering mode as emitted by the server-side field.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    #[default]
    Default,
    Filtered,
    /// Reserved. Behaves like `Default`.
    Custom,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SlashMenuConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub mode: MenuMode,

    #[serde(default)]
    pub disabled_items: Vec<String>,
}

impl Default for SlashMenuConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: MenuMode::Default,
            disabled_items: vec![],
        }
    }
}

impl SlashMenuConfig {
    /// Disabled keys to filter the host's block items with, if filtering applies.
    pub fn active_filter(&self) -> Option<&[String]> {
        if self.enabled && self.mode == MenuMode::Filtered && !self.disabled_items.is_empty() {
            Some(&self.disabled_items)
        } else {
            None
        }
    }
}

/// Size limits for template insertion.
///
/// `chunk_size` larger than `max_blocks` is accepted: [`validate`](Self::validate)
/// logs a warning and every template under the ceiling goes in with one call.
/// Zero for either value is a [`ConfigError`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Hard ceiling. Longer templates are replaced by an error notice.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,

    /// Blocks handed to the editor per insertion call.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Insert an in-document notice when the editor rejects a chunk.
    #[serde(default)]
    pub report_insertion_failures: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_blocks: default_max_blocks(),
            chunk_size: default_chunk_size(),
            report_insertion_failures: false,
        }
    }
}

impl TemplateConfig {
    pub fn new(max_blocks: usize, chunk_size: usize) -> Self {
        Self {
            max_blocks,
            chunk_size,
            report_insertion_failures: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_blocks == 0 {
            return Err(ConfigError::ZeroMaxBlocks);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_size > self.max_blocks {
            // Every template under the ceiling then goes in as a single call.
            log::warn!(
                "templateConfig.chunkSize ({}) exceeds maxBlocks ({})",
                self.chunk_size,
                self.max_blocks
            );
        }
        Ok(())
    }
}

/// Delays (milliseconds) used to let the host editor settle.
///
/// These are empirical waits for the host's internal update cycle. A host that
/// applies mutations synchronously can run with all of them at zero.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuTimings {
    pub debounce: u32,
    pub transition_debounce: u32,
    pub transition: u32,
    pub chunk_delay: u32,
    pub cursor_delay: u32,
}

impl Default for MenuTimings {
    fn default() -> Self {
        Self {
            debounce: 200,
            transition_debounce: 100,
            transition: 150,
            chunk_delay: 10,
            cursor_delay: 50,
        }
    }
}

impl MenuTimings {
    /// All delays zero: every scheduled step runs on the next scheduler turn.
    pub fn immediate() -> Self {
        Self {
            debounce: 0,
            transition_debounce: 0,
            transition: 0,
            chunk_delay: 0,
            cursor_delay: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub slash_menu_config: SlashMenuConfig,

    #[serde(default)]
    pub template_config: TemplateConfig,

    #[serde(default)]
    pub timings: MenuTimings,

    #[serde(default)]
    pub readonly: bool,
}

impl WidgetConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: WidgetConfig = serde_json::from_str(text)?;
        config.template_config.validate()?;
        Ok(config)
    }

    /// Like `from_json`, but a broken config never takes the widget down.
    pub fn parse_or_default(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("falling back to default widget config: {e}");
                Self::default()
            }
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_blocks() -> usize {
    3000
}

fn default_chunk_size() -> usize {
    500
}
