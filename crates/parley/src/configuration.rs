use crate::errors::{to_env_var, ConfigError};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    /// Channel carrying incremental state updates; events on any other channel are ignored
    #[serde(default = "default_update_channel")]
    pub update_channel: String,
    /// Key under which an update payload carries assistant output
    #[serde(default = "default_agent_node")]
    pub agent_node: String,
    /// Model used when a request doesn't name one
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            update_channel: default_update_channel(),
            agent_node: default_agent_node(),
            default_model: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistorySettings {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl HistorySettings {
    /// The configured history directory, falling back to `~/.config/parley/history`
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".config").join("parley").join("history"))
                .unwrap_or_else(|| PathBuf::from(".config/parley/history"))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

impl Settings {
    /// Load settings from defaults overlaid with `PARLEY_` environment variables
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("stream.update_channel", default_update_channel())?
            .set_default("stream.agent_node", default_agent_node())?
            .add_source(
                Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("stream.update_channel", &self.stream.update_channel),
            ("stream.agent_node", &self.stream.agent_node),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    env_var: to_env_var(field),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn default_update_channel() -> String {
    "updates".to_string()
}

fn default_agent_node() -> String {
    "agent".to_string()
}
