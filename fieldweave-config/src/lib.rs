//! Configuration loading for Fieldweave
//!
//! Builds an [`fieldweave_templating::EngineConfig`] from layered sources,
//! later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. An optional configuration file (`.yaml`/`.yml`, `.toml` or `.json`)
//! 3. `FIELDWEAVE_`-prefixed environment variables (`FIELDWEAVE_DATE_FORMAT=dd/MM/yyyy`)
//!
//! ```rust,ignore
//! use fieldweave_config::ConfigProvider;
//!
//! let config = ConfigProvider::new().with_file("fieldweave.toml").load()?;
//! ```

pub mod error;
pub mod provider;

pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigFormat, ConfigProvider, ENV_PREFIX};
