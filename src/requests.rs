use crate::api_client::{ApiClient, ApiError, Result};
use crate::query_string::QueryString;
use log::{debug, trace};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Query parameter carrying the access token
pub const API_CODE_PARAM: &str = "api_code";
/// Non-JSON body the service returns for unknown blocks
pub const BLOCK_NOT_FOUND: &str = "Block Not Found";

const ERROR_FIELD: &str = "error";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FIELD: &str = "payload";

/// The classification of one completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Success(String),
    ApplicationError { message: String, status: u16 },
    TransportError { status: u16, detail: String },
}

impl ResponseOutcome {
    /// Classifies a response from its status and raw body.
    ///
    /// Only two error shapes are recognized: an object whose first field is
    /// an `error` string (which the service also sends with a 2xx status),
    /// and the literal `Block Not Found` body on a failing status.
    pub fn classify(status: StatusCode, body: String) -> ResponseOutcome {
        if status.is_success() {
            return match structured_error_message(&body) {
                Some(message) => ResponseOutcome::ApplicationError {
                    message,
                    status: StatusCode::BAD_REQUEST.as_u16(),
                },
                None => ResponseOutcome::Success(body),
            };
        }
        if body == BLOCK_NOT_FOUND {
            return ResponseOutcome::ApplicationError {
                message: BLOCK_NOT_FOUND.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            };
        }
        ResponseOutcome::TransportError {
            status: status.as_u16(),
            detail: format!("{}: {}", status.canonical_reason().unwrap_or(""), body),
        }
    }

    /// Returns the payload of a successful exchange, or the refusal as an
    /// `ApiError::Server`
    pub fn into_payload(self) -> Result<String> {
        match self {
            ResponseOutcome::Success(payload) => Ok(payload),
            ResponseOutcome::ApplicationError { message, status } => Err(ApiError::Server {
                message,
                status: Some(status),
            }),
            ResponseOutcome::TransportError { status, detail } => Err(ApiError::Server {
                message: detail,
                status: Some(status),
            }),
        }
    }
}

/// Cheap check that an object body opens with an `error` key, so ordinary
/// payloads are never parsed twice
fn opens_with_error_key(body: &str) -> bool {
    body.trim_start()
        .strip_prefix('{')
        .and_then(|rest| rest.trim_start().strip_prefix("\"error\""))
        .map_or(false, |rest| rest.trim_start().starts_with(':'))
}

fn structured_error_message(body: &str) -> Option<String> {
    if !opens_with_error_key(body) {
        return None;
    }
    let parsed = json::parse(body).ok()?;
    let (key, value) = parsed.entries().next()?;
    if key == ERROR_FIELD {
        value.as_str().map(str::to_string)
    } else {
        None
    }
}

/// Default deserialization strategy: decode the payload as JSON into `T`
pub fn decode_json<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| {
        ApiError::FailedParsingResponse(format!(
            "{} as {}: {}",
            e,
            std::any::type_name::<T>(),
            payload
        ))
    })
}

impl ApiClient {
    /// Sets required headers for a request
    fn set_req_headers(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header(ACCEPT, "application/json")
    }

    /// Builds the route plus query for a GET request. The access token, when
    /// configured, overrides any `api_code` the caller supplied.
    pub fn compose_get_route(&self, route: &str, params: Option<QueryString>) -> Result<String> {
        if route.is_empty() {
            return Err(ApiError::InvalidRoute);
        }
        let mut params = params.unwrap_or_default();
        if let Some(code) = self.api_code() {
            params.add_or_replace(API_CODE_PARAM, code);
        }

        let mut target = route.to_string();
        if params.is_empty() {
            return Ok(target);
        }
        let query = params.serialize();
        match route.find('?') {
            Some(_) => {
                if !route.ends_with('?') && !route.ends_with('&') {
                    target.push('&');
                }
                target.push_str(&query[1..]);
            }
            None => target.push_str(&query),
        }
        Ok(target)
    }

    /// Builds the route for a POST request, with the access token appended
    /// as a literal query fragment
    pub fn compose_post_route(&self, route: &str) -> Result<String> {
        if route.is_empty() {
            return Err(ApiError::InvalidRoute);
        }
        Ok(match self.api_code() {
            Some(code) => format!("{}?{}={}", route, API_CODE_PARAM, code),
            None => route.to_string(),
        })
    }

    /// Sends a GET request and decodes the payload as JSON into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        route: &str,
        params: Option<QueryString>,
    ) -> Result<T> {
        self.get_with(route, params, decode_json::<T>).await
    }

    /// Sends a GET request and hands the payload to `deserialize`
    pub async fn get_with<T, F>(
        &self,
        route: &str,
        params: Option<QueryString>,
        deserialize: F,
    ) -> Result<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        let target = self.compose_get_route(route, params)?;
        debug!("GET {}", route);
        let rb = self.set_req_headers(self.http().get(self.endpoint_url(&target)));
        let payload = self.send_and_classify(rb, route).await?;
        deserialize(&payload)
    }

    /// Sends `body` as JSON in a POST request and decodes the payload as
    /// JSON into `T`
    pub async fn post<B, T>(&self, route: &str, body: &B, multipart: bool) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_with(route, body, multipart, decode_json::<T>).await
    }

    /// Sends `body` as JSON in a POST request and hands the payload to
    /// `deserialize`.
    ///
    /// The content type is `application/x-www-form-urlencoded` in both
    /// framings; `multipart` only wraps it in a single form-data part for
    /// endpoints that insist on multipart uploads.
    pub async fn post_with<B, T, F>(
        &self,
        route: &str,
        body: &B,
        multipart: bool,
        deserialize: F,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        F: FnOnce(&str) -> Result<T>,
    {
        let target = self.compose_post_route(route)?;
        let json_body = serde_json::to_string(body)
            .map_err(|e| ApiError::FailedSerializingBody(e.to_string()))?;
        debug!("POST {} (multipart: {})", route, multipart);

        let rb = self.set_req_headers(self.http().post(self.endpoint_url(&target)));
        let rb = if multipart {
            let part = form_part(json_body, FORM_URLENCODED)?;
            rb.multipart(Form::new().part(MULTIPART_FIELD, part))
        } else {
            rb.header(CONTENT_TYPE, FORM_URLENCODED).body(json_body)
        };
        let payload = self.send_and_classify(rb, route).await?;
        deserialize(&payload)
    }

    async fn send_and_classify(&self, rb: RequestBuilder, route: &str) -> Result<String> {
        let res = rb
            .send()
            .await
            .map_err(|e| ApiError::ServiceUnreachable(e.to_string()))?;
        let outcome = read_outcome(res).await?;
        trace!("{} -> {:?}", route, outcome);
        outcome.into_payload()
    }
}

fn form_part(content: String, mime: &str) -> Result<Part> {
    Part::text(content)
        .mime_str(mime)
        .map_err(|e| ApiError::FailedSerializingBody(format!("{}: {}", mime, e)))
}

async fn read_outcome(res: Response) -> Result<ResponseOutcome> {
    let status = res.status();
    let body = res.text().await.map_err(|_| {
        ApiError::FailedParsingResponse("Response Not Parseable into Text.".to_string())
    })?;
    Ok(ResponseOutcome::classify(status, body))
}
