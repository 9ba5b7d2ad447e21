use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_SETTINGS: &str = include_str!("../../defaults/settings.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PanelConfig {
    pub storage_key: String,
    pub user_link_prefix: String,
    /// Console log filter in `tracing_subscriber::filter::Targets` syntax.
    pub log: String,
    pub labels: LabelConfig,
    pub container: ContainerConfig,
    pub toggle: ToggleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelConfig {
    pub header: String,
    pub placeholder: String,
    pub toggle: String,
    pub remove: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContainerConfig {
    pub bottom: String,
    pub right: String,
    pub width: String,
    pub padding: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToggleConfig {
    pub bottom: String,
    pub right: String,
}

impl PanelConfig {
    /// Builds the configuration from the bundled defaults, overlaid by the
    /// page supplied `overlay` TOML when there is one. An overlay that
    /// cannot be used is logged and ignored.
    pub fn load(overlay: Option<&str>) -> Result<Self, ConfigError> {
        let Some(overlay) = overlay.filter(|o| !o.trim().is_empty()) else {
            return Self::default_config();
        };

        let merged = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_SETTINGS,
                config::FileFormat::Toml,
            ))
            .add_source(config::File::from_str(overlay, config::FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<PanelConfig>());
        match merged {
            Ok(config) => Ok(config),
            Err(error) => {
                tracing::error!("Failed to apply page configuration: {error}");
                Self::default_config()
            }
        }
    }

    pub fn default_config() -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_SETTINGS,
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|err| ConfigError::DeserError(err.to_string()))
    }
}
