/// The `ApiClient` struct is defined which allows for querying the
/// blockchain.info data API via Rust.
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Default endpoint of the public data API
pub const DEFAULT_BASE_URL: &str = "https://blockchain.info";
/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 100_000;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The request route must not be empty.")]
    InvalidRoute,
    #[error("Argument `{0}` must not be empty.")]
    ArgumentNull(&'static str),
    #[error("Argument `{name}` is out of range: {reason}")]
    ArgumentOutOfRange {
        name: &'static str,
        reason: &'static str,
    },
    #[error("Query string already has a value for {0}")]
    DuplicateParameter(String),
    /// Raised for every response the service refused. The message is kept
    /// verbatim since some error causes are only distinguishable by text.
    #[error("{message}")]
    Server {
        message: String,
        status: Option<u16>,
    },
    #[error("The service is unreachable: {0}")]
    ServiceUnreachable(String),
    #[error("Failed reading response from service: {0}")]
    FailedParsingResponse(String),
    #[error("Failed serializing request body: {0}")]
    FailedSerializingBody(String),
    #[error("Failed building HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error while processing client config yaml: {0}")]
    YamlError(String),
}

impl ApiError {
    /// Returns the service's message when this error was produced by
    /// response classification.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the service rejected the request with exactly `message`
    pub fn is_server_message(&self, message: &str) -> bool {
        self.server_message() == Some(message)
    }
}

/// Connection settings for an `ApiClient`. The access token is fixed for
/// the lifetime of the client built from it; rotating it means building a
/// new client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_code: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_code: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// The `ApiClient` struct which holds the endpoint, the optional access
/// token and a pooled HTTP client, and has methods implemented to query
/// the service. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_code: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a new `ApiClient` against the default public endpoint
    pub fn new(api_code: Option<&str>) -> Result<ApiClient> {
        ApiClient::from_config(&ClientConfig {
            api_code: api_code.map(str::to_string),
            ..ClientConfig::default()
        })
    }

    /// Create a new `ApiClient` against a custom endpoint
    pub fn with_base_url(base_url: &str, api_code: Option<&str>) -> Result<ApiClient> {
        ApiClient::from_config(&ClientConfig {
            base_url: base_url.to_string(),
            api_code: api_code.map(str::to_string),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<ApiClient> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(ApiClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_code: config.api_code.clone().filter(|code| !code.is_empty()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_code(&self) -> Option<&str> {
        self.api_code.as_deref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the absolute url for a route relative to the base endpoint
    pub fn endpoint_url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }
}
