use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geometry::{Align, Insets};
use crate::options::{PartialOptions, PartialWrapperConfig, DEFAULT_SCROLL_EVENT_THROTTLE_MS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub wrapper: WrapperSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Default scroll options, applied beneath per-call options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// "auto", "start", "end" or "center"
    #[serde(default)]
    pub align: Align,
    /// Animate the scroll
    #[serde(default = "default_true")]
    pub animated: bool,
    /// Bypass the 16ms throttle
    #[serde(default)]
    pub immediate: bool,
    #[serde(default)]
    pub insets: Insets,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            align: Align::default(),
            animated: default_true(),
            immediate: false,
            insets: Insets::default(),
        }
    }
}

impl OptionsConfig {
    /// Option layer for a wrapper or a single call
    pub fn to_partial_options(&self) -> crate::Result<PartialOptions> {
        self.insets.validate()?;
        Ok(PartialOptions::new()
            .align(self.align)
            .animated(self.animated)
            .immediate(self.immediate)
            .insets(self.insets))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapperSettings {
    /// Scroll event interval hint for the host, in milliseconds
    #[serde(default = "default_scroll_event_throttle")]
    pub scroll_event_throttle_ms: u64,
}

impl Default for WrapperSettings {
    fn default() -> Self {
        Self {
            scroll_event_throttle_ms: default_scroll_event_throttle(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_event_throttle() -> u64 {
    DEFAULT_SCROLL_EVENT_THROTTLE_MS
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.options.insets.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollintoview/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollintoview")
            .join("config.toml")
    }

    /// Wrapper configuration described by the `[options]` and `[wrapper]` tables
    pub fn wrapper_config(&self) -> crate::Result<PartialWrapperConfig> {
        Ok(PartialWrapperConfig::default()
            .with_scroll_event_throttle(Duration::from_millis(self.wrapper.scroll_event_throttle_ms))
            .with_options(self.options.to_partial_options()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::options::normalize_wrapper_config;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.options.align, Align::Auto);
        assert!(config.options.animated);
        assert!(!config.options.immediate);
        assert_eq!(config.wrapper.scroll_event_throttle_ms, 16);
    }

    #[test]
    fn test_parse_options() {
        let config = AppConfig::parse(
            r#"
            [general]
            log_level = "debug"

            [options]
            align = "center"
            animated = false

            [options.insets]
            top = 20.0
            bottom = 8.0

            [wrapper]
            scroll_event_throttle_ms = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.general.log_level, "debug");
        let wrapper = normalize_wrapper_config(&config.wrapper_config().unwrap());
        assert_eq!(wrapper.scroll_event_throttle, Duration::from_millis(32));
        assert_eq!(wrapper.options.align, Align::Center);
        assert!(!wrapper.options.animated);
        assert_eq!(wrapper.options.insets.top, Some(20.0));
        assert_eq!(wrapper.options.insets.bottom, Some(8.0));
        assert_eq!(wrapper.options.insets.left, Some(0.0));
    }

    #[test]
    fn test_rejects_unknown_alignment() {
        let err = AppConfig::parse("[options]\nalign = \"middle\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("align=middle not supported")));
    }

    #[test]
    fn test_rejects_negative_insets() {
        let err = AppConfig::parse("[options.insets]\ntop = -4.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("scrollintoview-config-{}", std::process::id()))
            .join("config.toml");
        let mut config = AppConfig::default();
        config.options.align = Align::End;
        config.options.insets = Insets::uniform(12.0);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.options.align, Align::End);
        assert_eq!(loaded.options.insets, Insets::uniform(12.0));
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/scrollintoview.toml")).unwrap();
        assert_eq!(config.wrapper.scroll_event_throttle_ms, 16);
    }
}
