//! Configuration provider using Figment

use std::path::{Path, PathBuf};

use fieldweave_templating::EngineConfig;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};

/// Prefix for environment variables that override configuration values
pub const ENV_PREFIX: &str = "FIELDWEAVE_";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Determine the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                format: if extension.is_empty() {
                    path.display().to_string()
                } else {
                    extension
                },
            }),
        }
    }
}

/// Loads [`EngineConfig`] from defaults, an optional file and the environment.
///
/// Configuration is read fresh on every [`ConfigProvider::load`].
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    file: Option<PathBuf>,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a configuration file over the defaults.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Load the engine configuration from all sources.
    pub fn load(&self) -> ConfigResult<EngineConfig> {
        let config: EngineConfig = self.build_figment()?.extract()?;
        debug!(
            date_time_format = %config.date_time_format,
            max_render_depth = config.max_render_depth,
            "engine configuration loaded"
        );
        Ok(config)
    }

    /// Build the figment with all sources in precedence order.
    pub fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(EngineConfig::default()));

        if let Some(path) = &self.file {
            figment = figment.merge(Self::load_config_file(path)?);
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    fn load_config_file(path: &Path) -> ConfigResult<Figment> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let format = ConfigFormat::from_path(path)?;
        trace!("Loading config file: {} ({:?})", path.display(), format);

        Ok(match format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        })
    }
}
