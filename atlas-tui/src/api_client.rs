//! REST transport for the ATLAS backend.

use crate::config::TuiConfig;
use async_trait::async_trait;
use atlas_core::{
    ErrorBody, ErrorInfo, ErrorKind, OperationKind, Request, Response, ServerStatus, Transport,
    GENERIC_ERROR_MESSAGE,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::time::{Duration, Instant};

/// Header that tells the tunneling proxy in front of the backend to skip its
/// browser interstitial.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_options(
            config.base_url(),
            config.request_timeout_ms.map(Duration::from_millis),
            config.tunnel_bypass,
        )
    }

    pub fn with_options(
        base_url: &str,
        timeout: Option<Duration>,
        tunnel_bypass: bool,
    ) -> Result<Self, ApiClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiClientError::Config("base URL must not be empty".to_string()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            headers: build_headers(tunnel_bypass),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn send(&self, request: Request) -> Result<Response, ErrorInfo> {
        request.validate()?;

        let operation = request.target();
        let request_id = request.request_id();
        let started = Instant::now();
        tracing::debug!(%request_id, %operation, "Sending request");

        let response = self
            .client
            .post(self.url(operation.path()))
            .headers(self.headers.clone())
            .json(&request.body())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        let outcome = decode_reply(operation, status, &body);

        let latency_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::info!(%request_id, %operation, status, latency_ms, "Request succeeded"),
            Err(err) => tracing::warn!(
                %request_id,
                %operation,
                status,
                latency_ms,
                kind = %err.kind,
                error = %err,
                "Request failed"
            ),
        }
        outcome
    }

    async fn status(&self) -> Result<ServerStatus, ErrorInfo> {
        let response = self
            .client
            .get(self.url("/"))
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        if !(200..300).contains(&status) {
            return Err(decode_error_body(status, &body));
        }
        serde_json::from_str::<ServerStatus>(&body)
            .map_err(|e| ErrorInfo::decode(format!("Malformed status response from server: {}", e)))
    }
}

/// Turn a status code and raw body into the normalized outcome.
///
/// 2xx bodies are decoded as the operation's success shape. Anything else is
/// an error: the body's `message` is surfaced when present, otherwise the
/// generic message is used.
pub fn decode_reply(operation: OperationKind, status: u16, body: &str) -> Result<Response, ErrorInfo> {
    if (200..300).contains(&status) {
        return Response::decode(operation, body).map_err(|e| {
            ErrorInfo::decode(format!(
                "Malformed {} response from server: {}",
                operation.label().to_lowercase(),
                e
            ))
        });
    }
    Err(decode_error_body(status, body))
}

fn decode_error_body(status: u16, body: &str) -> ErrorInfo {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error_body) => match error_body.usable_message() {
            Some(message) => ErrorInfo::http(status, message),
            None => ErrorInfo::http_generic(status),
        },
        Err(err) => {
            tracing::debug!(status, error = %err, "Undecodable error body");
            ErrorInfo::new(ErrorKind::Decode, GENERIC_ERROR_MESSAGE)
        }
    }
}

fn transport_error(err: reqwest::Error) -> ErrorInfo {
    if err.is_decode() {
        ErrorInfo::decode(format!("Could not read server response: {}", err))
    } else if err.is_timeout() {
        ErrorInfo::network(format!("The ATLAS server did not respond in time: {}", err))
    } else if err.is_connect() {
        ErrorInfo::network(format!("Could not connect to the ATLAS server: {}", err))
    } else {
        ErrorInfo::network(format!("Request to the ATLAS server failed: {}", err))
    }
}

fn build_headers(tunnel_bypass: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if tunnel_bypass {
        headers.insert(
            HeaderName::from_static(TUNNEL_BYPASS_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::ModelKey;

    #[test]
    fn test_error_status_with_message_surfaces_it() {
        let err = decode_reply(OperationKind::Analyze, 500, r#"{"message":"boom"}"#).unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(err.kind, ErrorKind::Http { status: 500 });
    }

    #[test]
    fn test_numeric_status_field_keeps_message() {
        let err = decode_reply(OperationKind::Analyze, 500, r#"{"status":500,"message":"boom"}"#)
            .unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(err.kind, ErrorKind::Http { status: 500 });
    }

    #[test]
    fn test_error_status_without_message_is_generic() {
        let err = decode_reply(OperationKind::Debate, 400, r#"{"status":"error"}"#).unwrap_err();
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_undecodable_error_body_is_generic() {
        let err = decode_reply(OperationKind::Ask, 502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let err = decode_reply(OperationKind::Analyze, 200, r#"{"unexpected":1}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.message.contains("analyze"));
    }

    #[test]
    fn test_success_body_decodes() {
        let response =
            decode_reply(OperationKind::Analyze, 200, r#"{"osint_report":"1. Heading\nBody text"}"#)
                .unwrap();
        assert_eq!(response.primary_text(), "1. Heading\nBody text");
    }

    #[test]
    fn test_tunnel_header_only_when_enabled() {
        assert!(build_headers(true).contains_key(TUNNEL_BYPASS_HEADER));
        assert!(!build_headers(false).contains_key(TUNNEL_BYPASS_HEADER));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RestClient::with_options("http://localhost:5000/", None, false).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url(OperationKind::Debate.path()),
            "http://localhost:5000/run_debate"
        );
    }

    #[tokio::test]
    async fn test_blank_request_refused_without_network() {
        // Port 9 (discard) is never contacted: validation fails first.
        let client = RestClient::with_options("http://127.0.0.1:9", None, false).unwrap();
        let err = client
            .send(Request::analyze("   ", ModelKey::Llama3))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
    }
}
