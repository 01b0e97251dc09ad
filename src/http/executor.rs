use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use futures_util::StreamExt;
use reqwest::{
    Client, Method, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{RequestMethod, RequestSpec};
use crate::error::{AppError, AppResult, HttpError};
use crate::logs::{RequestLog, RequestRecord, ResponseRecord};

use super::target::join_url;

/// Lowest status counted as a success.
const SUCCESS_STATUS_MIN: u16 = 200;
/// First status past the success band. Deliberately narrower than 2xx.
const SUCCESS_STATUS_END: u16 = 210;

/// Result of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub elapsed: Duration,
    /// `0` when no response was received.
    pub status_code: u16,
    pub success: bool,
    pub response_bytes: u64,
}

impl RequestOutcome {
    /// Outcome recorded for transport failures and unsupported methods.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            elapsed: Duration::ZERO,
            status_code: 0,
            success: false,
            response_bytes: 0,
        }
    }

    #[must_use]
    pub const fn completed(elapsed: Duration, status_code: u16, response_bytes: u64) -> Self {
        Self {
            elapsed,
            status_code,
            success: is_success_status(status_code),
            response_bytes,
        }
    }
}

#[must_use]
pub const fn is_success_status(status_code: u16) -> bool {
    status_code >= SUCCESS_STATUS_MIN && status_code < SUCCESS_STATUS_END
}

/// Issues one request per descriptor.
///
/// Transport failures are folded into a failed [`RequestOutcome`]; an `Err`
/// means the run itself can no longer continue.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> AppResult<RequestOutcome>;
}

/// [`RequestExecutor`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    target_host: String,
    headers: HeaderMap,
    log: RequestLog,
}

impl HttpExecutor {
    /// # Errors
    ///
    /// Returns an error when the bearer token is not a valid header value.
    pub fn new(
        client: Client,
        target_host: String,
        auth_token: Option<&str>,
        log: RequestLog,
    ) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|err| AppError::http(HttpError::InvalidAuthToken { source: err }))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(Self {
            client,
            target_host,
            headers,
            log,
        })
    }

    fn record(
        &self,
        method: &Method,
        url: String,
        payload: Option<String>,
        response: Result<ResponseRecord, String>,
    ) -> AppResult<()> {
        self.log.record(RequestRecord {
            timestamp: Local::now(),
            method: method.as_str().to_owned(),
            url,
            request_headers: header_pairs(&self.headers),
            payload,
            response,
        })
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: &RequestSpec) -> AppResult<RequestOutcome> {
        let method = match &spec.method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
            RequestMethod::Put => Method::PUT,
            RequestMethod::Delete => Method::DELETE,
            RequestMethod::Unsupported(name) => {
                let err = HttpError::UnsupportedMethod {
                    method: name.clone(),
                };
                warn!("Skipping request to {}: {}", spec.path, err);
                return Ok(RequestOutcome::failed());
            }
        };

        let url = join_url(&self.target_host, &spec.path);
        let payload = if spec.method.sends_body() {
            let body = spec.body.as_ref().unwrap_or(&Value::Null);
            Some(serde_json::to_string(body)?)
        } else {
            None
        };
        let log_payload = logged_payload(payload.as_deref(), spec.body.as_ref())?;

        let mut request = self
            .client
            .request(method.clone(), url.as_str())
            .headers(self.headers.clone());
        let query = spec.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("{} {} failed: {}", method, url, err);
                self.record(&method, url, log_payload, Err(err.to_string()))?;
                return Ok(RequestOutcome::failed());
            }
        };
        let status = response.status().as_u16();
        let response_headers = header_pairs(response.headers());
        let body = match read_body(response).await {
            Ok(body) => body,
            Err(err) => {
                debug!("{} {} body read failed: {}", method, url, err);
                self.record(&method, url, log_payload, Err(err.to_string()))?;
                return Ok(RequestOutcome::failed());
            }
        };
        let elapsed = start.elapsed();

        let response_bytes = u64::try_from(body.len()).unwrap_or(u64::MAX);
        self.record(
            &method,
            url,
            log_payload,
            Ok(ResponseRecord {
                status,
                headers: response_headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        )?;

        Ok(RequestOutcome::completed(elapsed, status, response_bytes))
    }
}

/// Payload text for the request log. A body configured on a method that does
/// not send one is still shown, marked as not sent.
fn logged_payload(sent: Option<&str>, configured: Option<&Value>) -> AppResult<Option<String>> {
    if let Some(sent) = sent {
        return Ok(Some(sent.to_owned()));
    }
    let unsent = configured
        .map(|body| serde_json::to_string(body).map(|text| format!("{} (not sent)", text)))
        .transpose()?;
    Ok(unsent)
}

async fn read_body(response: Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                value.to_str().unwrap_or("<binary>").to_owned(),
            )
        })
        .collect()
}
