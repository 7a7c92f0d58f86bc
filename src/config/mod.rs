use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Delays and durations, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub notification_ms: u64,     // Toast stays up this long before auto-dismiss
    pub exit_transition_ms: u64,  // Slide-out before the toast is removed
    pub counter_duration_ms: u64,
    pub counter_tick_ms: u64,
    pub subscribe_delay_ms: u64,
    pub contact_delay_ms: u64,
    pub load_more_delay_ms: u64,
    pub ripple_ms: u64,
    pub card_stagger_ms: u64,     // Delay between fade-ins of newly loaded cards
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            notification_ms: 5000,
            exit_transition_ms: 300,
            counter_duration_ms: 2000,
            counter_tick_ms: 16,
            subscribe_delay_ms: 1500,
            contact_delay_ms: 2000,
            load_more_delay_ms: 1500,
            ripple_ms: 600,
            card_stagger_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatConfig {
    pub label: String,
    pub target: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Cards in the blog grid before any "load more"
    pub initial_posts: usize,
    /// The load-more button hides once the grid holds more cards than this
    pub max_posts: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub stats: Vec<StatConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        let stat = |label: &str, target| StatConfig {
            label: label.to_string(),
            target,
        };
        Self {
            initial_posts: 6,
            max_posts: 8,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            stats: vec![
                stat("Articles Published", 150),
                stat("Monthly Readers", 25000),
                stat("Expert Writers", 50),
                stat("Countries Reached", 1000),
            ],
        }
    }
}

/// Optional colour overrides for the previewer, as `#RRGGBB` or `#RGB`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timings: Timings,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("blogfx");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or create it with defaults
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    match toml::from_str::<AppConfig>(&content) {
                        Ok(config) => return Ok(config.sanitized()),
                        Err(e) => tracing::warn!("Failed to parse config: {}", e),
                    }
                }
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Load an explicit config file. Unlike `load`, errors are returned.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamp values that would stall or break the page
    fn sanitized(mut self) -> Self {
        if self.timings.counter_tick_ms == 0 {
            tracing::warn!("counter_tick_ms must be positive, using 16");
            self.timings.counter_tick_ms = 16;
        }
        if self.page.viewport_width <= 0.0 || self.page.viewport_height <= 0.0 {
            tracing::warn!("Viewport size must be positive, using defaults");
            let defaults = PageConfig::default();
            self.page.viewport_width = defaults.viewport_width;
            self.page.viewport_height = defaults.viewport_height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            timings: Timings {
                notification_ms: 4000,
                ..Default::default()
            },
            page: PageConfig {
                initial_posts: 3,
                ..Default::default()
            },
            theme: ThemeConfig {
                accent: Some("#FFC107".to_string()),
                ..Default::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [timings]
            contact_delay_ms = 500

            [page]
            max_posts = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.timings.contact_delay_ms, 500);
        assert_eq!(config.timings.notification_ms, 5000);
        assert_eq!(config.page.max_posts, 12);
        assert_eq!(config.page.stats.len(), 4);
    }

    #[test]
    fn test_zero_tick_is_sanitized() {
        let mut config = AppConfig::default();
        config.timings.counter_tick_ms = 0;
        assert_eq!(config.sanitized().timings.counter_tick_ms, 16);
    }
}
