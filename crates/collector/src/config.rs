use crate::error::{CollectorError, Result};
use crate::spec_text::SpecMarkers;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Saved-objects index searched when nothing else is configured.
pub const DEFAULT_INDEX: &str = ".kibana";
pub const DEFAULT_SEARCH_SIZE: usize = 10_000;
/// Host config key under which a spec declares `type: map`.
pub const DEFAULT_MAP_CONFIG_KEY: &str = "kibana";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorConfig {
    pub index: String,
    pub size: usize,
    pub map_config_keys: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            size: DEFAULT_SEARCH_SIZE,
            map_config_keys: vec![DEFAULT_MAP_CONFIG_KEY.to_string()],
        }
    }
}

impl CollectorConfig {
    /// Load from a JSON or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|err| match err {
            CollectorError::Config(msg) => {
                CollectorError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(json_err) => {
                let utf8 = std::str::from_utf8(bytes)
                    .map_err(|err| CollectorError::Config(format!("{json_err}; {err}")))?;
                let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                    CollectorError::Config(format!(
                        "config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                    ))
                })?;
                serde_json::to_value(toml_value).map_err(|err| {
                    CollectorError::Config(format!("failed to convert TOML config to JSON: {err}"))
                })?
            }
        };

        let config: Self = serde_json::from_value(value)
            .map_err(|err| CollectorError::Config(format!("config parse error: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(CollectorError::Config("index must not be empty".to_string()));
        }
        if self.size == 0 {
            return Err(CollectorError::Config("size must be positive".to_string()));
        }
        if self.map_config_keys.is_empty() {
            return Err(CollectorError::Config(
                "map_config_keys must list at least one key".to_string(),
            ));
        }
        Ok(())
    }

    pub fn markers(&self) -> Result<SpecMarkers> {
        SpecMarkers::new(&self.map_config_keys)
    }
}
