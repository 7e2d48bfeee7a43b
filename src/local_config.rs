/// Functions related to saving/accessing local configuration
/// for connecting to the data API. (Base url/Access token/Timeout)
use crate::api_client::{ApiClient, ApiError, ClientConfig, Result, DEFAULT_TIMEOUT_MS};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Duration;
use yaml_rust::{Yaml, YamlLoader};

pub const LOCAL_CONFIG_FILE: &str = "blockchain-api.yaml";

static BAREBONES_CONFIG_YAML: &str = r#"
# Base url of the data API (edit if you run against a different endpoint)
base_url: "https://blockchain.info"
# Access token sent as `api_code` (leave empty to send none)
api_code: ""
# Request timeout in milliseconds
timeout_ms: 100000
"#;

/// Basic function to check if a local config currently exists
pub fn does_local_config_exist() -> bool {
    Path::new(LOCAL_CONFIG_FILE).exists()
}

/// Create a new config file at `file_path` with the barebones yaml inside.
/// Fails if the file already exists.
pub fn create_new_local_config_file(file_path: &Path) -> Result<()> {
    if file_path.exists() {
        return Err(ApiError::YamlError(format!(
            "Config file `{}` already exists.",
            file_path.display()
        )));
    }
    let mut file = File::create(file_path).map_err(|_| {
        ApiError::YamlError(format!("Failed to create `{}` file", file_path.display()))
    })?;
    file.write_all(BAREBONES_CONFIG_YAML.as_bytes()).map_err(|_| {
        ApiError::YamlError(format!("Failed to write to `{}` file", file_path.display()))
    })
}

/// Uses the config yaml provided to create a new `ClientConfig`.
/// Only `base_url` is required.
pub fn new_config_from_yaml(config: &Yaml) -> Result<ClientConfig> {
    let base_url = config["base_url"].as_str().ok_or_else(|| {
        ApiError::YamlError("`base_url` is not specified in the provided Yaml".to_string())
    })?;
    let api_code = match &config["api_code"] {
        Yaml::BadValue | Yaml::Null => None,
        value => Some(
            value
                .as_str()
                .ok_or_else(|| ApiError::YamlError("`api_code` must be a string".to_string()))?
                .to_string(),
        ),
    }
    .filter(|code| !code.is_empty());
    let timeout_ms = match &config["timeout_ms"] {
        Yaml::BadValue | Yaml::Null => DEFAULT_TIMEOUT_MS,
        value => {
            let ms = value.as_i64().filter(|ms| *ms > 0).ok_or_else(|| {
                ApiError::YamlError("`timeout_ms` must be a positive integer".to_string())
            })?;
            ms as u64
        }
    };
    Ok(ClientConfig {
        base_url: base_url.to_string(),
        api_code,
        timeout: Duration::from_millis(timeout_ms),
    })
}

/// Reads a config file and parses the first yaml document in it
pub fn new_config_from_file(file_path: &Path) -> Result<ClientConfig> {
    let yaml_str = std::fs::read_to_string(file_path).map_err(|_| {
        ApiError::YamlError(format!("Failed to read `{}` file", file_path.display()))
    })?;
    let docs = YamlLoader::load_from_str(&yaml_str)
        .map_err(|e| ApiError::YamlError(e.to_string()))?;
    let yaml = docs
        .first()
        .ok_or_else(|| ApiError::YamlError("Config file is empty".to_string()))?;
    new_config_from_yaml(yaml)
}

/// Opens the local `blockchain-api.yaml` file and uses the data inside
/// to create a `ClientConfig`
pub fn new_config_from_local_config() -> Result<ClientConfig> {
    new_config_from_file(Path::new(LOCAL_CONFIG_FILE))
}

/// Opens the local `blockchain-api.yaml` file and builds an `ApiClient`
/// from it
pub fn new_client_from_local_config() -> Result<ApiClient> {
    ApiClient::from_config(&new_config_from_local_config()?)
}
