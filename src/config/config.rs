use std::net::SocketAddr;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::logging::LoggingConfig;
use super::podio::{PodioConfig, CREDENTIAL_VARIABLES};

pub const CONFIG_VERSION: &str = "1.0.0";

/// Environment variable pointing at an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "PODIO_ASSISTANT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct ConfigV1 {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Overrides the port of `bind_address` (set from `PORT`).
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub podio: PodioConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

impl ConfigV1 {
    /// Checks every invariant the server relies on before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.podio.missing_variables();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        self.logging.level_filter()?;
        self.logging.log_format()?;
        self.listen_address()?;
        Ok(())
    }

    /// The socket address to bind, with `port` applied on top of `bind_address`.
    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        let mut address: SocketAddr = self.bind_address.trim().parse().map_err(|source| {
            ConfigError::InvalidBindAddress {
                address: self.bind_address.clone(),
                source,
            }
        })?;
        if let Some(port) = self.port {
            address.set_port(port);
        }
        Ok(address)
    }
}

/// Lowest-priority layer: only the config version, so env-only deployments work.
pub fn defaults() -> Figment {
    Figment::from(Serialized::default("version", CONFIG_VERSION))
}

/// Defaults, then the YAML file, then the process environment.
pub fn figment() -> Figment {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    with_environment(defaults().merge(Yaml::file(path)))
}

/// Layers environment overrides on top of `figment`.
pub fn with_environment(figment: Figment) -> Figment {
    let mut figment = figment.merge(Env::raw().filter_map(|key| {
        setting_key_path(key.as_str()).map(Into::into)
    }));

    // Credentials are merged verbatim: the Env provider would turn numeric ids into integers.
    for (variable, key_path) in CREDENTIAL_VARIABLES {
        if let Ok(value) = std::env::var(variable) {
            figment = figment.merge(Serialized::global(key_path, value));
        }
    }
    figment
}

/// Maps optional setting variables onto their config key.
fn setting_key_path(key: &str) -> Option<&'static str> {
    let path = match key.to_ascii_uppercase().as_str() {
        "BIND_ADDRESS" => "bind_address",
        "PORT" => "port",
        "LOG_LEVEL" => "logging.level",
        "LOG_FORMAT" => "logging.format",
        "PODIO_API_URL" => "podio.api_url",
        "PODIO_TIMEOUT_MS" => "podio.timeout_in_ms",
        _ => return None,
    };
    Some(path)
}

/// Load the configuration from the YAML file and the environment, then validate it.
pub fn load_config() -> Result<ConfigV1, ConfigError> {
    load_config_from(figment())
}

/// Extract and validate a configuration from an arbitrary figment.
pub fn load_config_from(figment: Figment) -> Result<ConfigV1, ConfigError> {
    let config = match figment.extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };
    config.validate()?;
    Ok(config)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
