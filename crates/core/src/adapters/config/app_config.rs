use std::time::Duration;

use config::Config;
use error_stack::{report, ResultExt};
use thiserror::Error;

use super::{
    blockchain_config::BlockchainConfig,
    price_config::{CoingeckoConfig, ParamsConfig},
    sheets_config::{OutputConfig, SpreadsheetConfig},
};

pub const DEFAULT_CONFIG_PATH: &str = "Config";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Error reading config file '{0}'")]
    ReadError(String),
    #[error("Failed to deserialize config, field path: {field}")]
    DeserializeError { field: String },
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Whole process configuration, loaded once at startup and passed down
/// explicitly.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
    /// Chain settings live at the top level of the file.
    #[serde(flatten)]
    pub blockchain: BlockchainConfig,
    #[serde(default)]
    pub coingecko: CoingeckoConfig,
    #[serde(default)]
    pub params: ParamsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Loads the file named by `CONFIG_PATH`, `Config.{toml,json,yaml}` by
    /// default.
    pub fn load() -> error_stack::Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> error_stack::Result<Self, ConfigError> {
        let value = Config::builder()
            .add_source(config::File::with_name(config_path))
            .build()
            .change_context_lazy(|| ConfigError::ReadError(config_path.to_string()))?
            .try_deserialize::<serde_json::Value>()
            .change_context_lazy(|| ConfigError::ReadError(config_path.to_string()))
            .attach_printable("Config to JSON failed")?;

        Self::from_value(value)
            .attach_printable_lazy(|| format!("Config file: {config_path}"))
    }

    pub fn from_value(value: serde_json::Value) -> error_stack::Result<Self, ConfigError> {
        let config: AppConfig = serde_path_to_error::deserialize(value).map_err(|e| {
            let field = e.path().to_string();
            report!(e.into_inner())
                .change_context(ConfigError::DeserializeError { field })
                .attach_printable(
                    "Make sure all required fields are present in the configuration file.",
                )
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> error_stack::Result<(), ConfigError> {
        let sleep_time = self.params.sleep_time;
        if !sleep_time.is_finite() || sleep_time < 0.0 {
            return Err(report!(ConfigError::ValidationError(format!(
                "params.sleep_time must be a non-negative number of seconds, got {sleep_time}"
            ))));
        }

        if self.params.max_retries == 0 {
            return Err(report!(ConfigError::ValidationError(
                "params.max_retries must be at least 1".to_string()
            )));
        }

        if let Some(chain) = self
            .blockchain
            .evm_chains
            .iter()
            .find(|chain| self.blockchain.chain(chain).is_none())
        {
            return Err(report!(ConfigError::ValidationError(format!(
                "EVM chain '{chain}' has no chains.{chain}.rpc_url entry"
            ))));
        }

        Ok(())
    }

    pub fn sleep_interval(&self) -> Duration {
        Duration::from_secs_f64(self.params.sleep_time)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.params.request_timeout_secs)
    }
}
