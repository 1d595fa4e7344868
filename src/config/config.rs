use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::guards::GuardsConfig;
use super::logging::LoggingConfig;
use super::storage::StorageConfig;

/// Environment variables with this prefix override values from the YAML file,
/// e.g. `ASSIGNMENTPRO_API_BASE_URL` or `ASSIGNMENTPRO_LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "ASSIGNMENTPRO_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend location, local storage, guard policy, logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    /// Base URL of the REST backend. API paths such as `api/auth/verify` are appended to it.
    pub api_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_in_ms: u64,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub guards: GuardsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_request_timeout() -> u64 {
    10_000
}

impl ConfigV1 {
    /// The base URL with exactly one trailing slash, so relative API paths can be appended.
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.api_base_url.trim_end_matches('/'))
    }
}

/// Extract a versioned config from any figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Build the figment for a YAML file plus `ASSIGNMENTPRO_` environment overrides.
pub fn config_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load config from the given YAML file. Exits the process if the configuration is invalid.
pub fn load_config(path: &Path) -> ConfigV1 {
    match extract_config(config_figment(path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
