//! Quickhelp configuration.
//!
//! Configuration is loaded from `~/.config/helix/quickhelp.toml` and provides
//! the popup timing, size, styling and logging settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use etcetera::BaseStrategy;
use serde::{Deserialize, Deserializer};

use crate::surface::PopupStyle;

/// Delay used when `delay = true` is written in the config file.
pub const DEFAULT_DELAY_SECS: f64 = 0.5;

/// Quickhelp configuration loaded from `quickhelp.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuickhelpConfig {
    pub popup: PopupConfig,
    pub logging: LoggingConfig,
}

/// Popup behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Idle delay in seconds before the popup appears. `None` disables
    /// automatic display; `delay = false` in TOML.
    #[serde(deserialize_with = "deserialize_delay")]
    pub delay: Option<f64>,
    /// Maximum number of documentation lines. `None` means unlimited.
    pub max_lines: Option<usize>,
    /// Foreground color hint, e.g. `"#abb2bf"`.
    pub foreground: Option<String>,
    /// Background color hint.
    pub background: Option<String>,
    /// Let the surface keep the styling the backend attached to the docs.
    /// When off the popup is plain text in the configured colors.
    pub use_styled_text: bool,
    /// Convert markdown markup to plain text before display.
    pub render_markdown: bool,
    /// Lines starting with one of these are dropped from the end of the docs.
    pub footer_markers: Vec<String>,
    /// Appended after truncated documentation.
    pub truncation_marker: String,
    /// Whether the popup shows automatically while idling.
    pub enabled: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: Option<PathBuf>,
    pub level: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            delay: Some(DEFAULT_DELAY_SECS),
            max_lines: None,
            foreground: None,
            background: None,
            use_styled_text: false,
            render_markdown: false,
            footer_markers: vec!["[back]".to_string(), "[source]".to_string()],
            truncation_marker: "[...]".to_string(),
            enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDelay {
    Seconds(f64),
    Toggle(bool),
}

fn deserialize_delay<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawDelay::deserialize(deserializer)? {
        RawDelay::Seconds(secs) => Some(secs),
        RawDelay::Toggle(true) => Some(DEFAULT_DELAY_SECS),
        RawDelay::Toggle(false) => None,
    })
}

impl PopupConfig {
    /// The idle delay, or `None` when automatic display is off.
    ///
    /// Negative and non-finite values count as off.
    #[must_use]
    pub fn idle_delay(&self) -> Option<Duration> {
        self.delay
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Color hints handed to the surface.
    #[must_use]
    pub fn style(&self) -> PopupStyle {
        PopupStyle {
            foreground: self.foreground.clone(),
            background: self.background.clone(),
            styled_text: self.use_styled_text,
        }
    }
}

impl QuickhelpConfig {
    /// Load configuration from the default location (`~/.config/helix/quickhelp.toml`).
    ///
    /// Falls back to defaults if the file doesn't exist.
    /// Returns an error only if the file exists but is malformed.
    pub fn load_default() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str::<QuickhelpConfig>(&content)?;
        Ok(config)
    }

    /// Set the idle delay in seconds.
    #[must_use]
    pub fn with_delay(mut self, secs: f64) -> Self {
        self.popup.delay = Some(secs);
        self
    }

    /// Turn off automatic display.
    #[must_use]
    pub fn without_delay(mut self) -> Self {
        self.popup.delay = None;
        self
    }

    /// Limit the popup to `lines` documentation lines.
    #[must_use]
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.popup.max_lines = Some(lines);
        self
    }

    /// Set the foreground and background color hints.
    #[must_use]
    pub fn with_colors(mut self, foreground: impl Into<String>, background: impl Into<String>) -> Self {
        self.popup.foreground = Some(foreground.into());
        self.popup.background = Some(background.into());
        self
    }

    /// Set whether the surface may keep backend styling.
    #[must_use]
    pub fn with_styled_text(mut self, enabled: bool) -> Self {
        self.popup.use_styled_text = enabled;
        self
    }

    #[must_use]
    pub fn with_markdown_rendering(mut self, enabled: bool) -> Self {
        self.popup.render_markdown = enabled;
        self
    }

    /// Set the log file path.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.logging.log_file = Some(path.into());
        self
    }

    /// Set the log level (e.g., "info", "debug", "warn").
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }
}

fn default_config_path() -> Result<PathBuf> {
    let strategy = etcetera::choose_base_strategy()?;
    Ok(strategy.config_dir().join("helix").join("quickhelp.toml"))
}
