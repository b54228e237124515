//! The seam between the client and the wire.

use crate::config::ApiConfig;
use crate::cookies::StoredCookies;
use crate::error::TransportError;
use crate::request::{ApiRequest, RequestBody};
use crate::response::RawResponse;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Sends a request and returns whatever the backend answered.
///
/// Any status counts as a response; only failures to get one are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

/// HTTP transport backed by `reqwest`, with cookies carried across calls.
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ReqwestTransport {
    /// Create a transport with an in-memory cookie jar.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Create a transport whose cookie jar lives in a store.
    pub fn with_cookies(
        config: ApiConfig,
        cookies: Arc<StoredCookies>,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_provider(cookies)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The connection settings.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.config.url(&request.path);
        let mut builder = self.http.request(request.method.into(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(file) => {
                let mut part = reqwest::multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone());
                if let Some(content_type) = &file.content_type {
                    part = part.mime_str(content_type)?;
                }
                builder.multipart(reqwest::multipart::Form::new().part(file.field.clone(), part))
            }
        };

        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let response = self.build(request)?.send().await?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse::new(status, headers, body))
    }
}

/// In-memory transport that replays queued outcomes in order and records
/// every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, response: RawResponse) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(RawResponse::json(status, &body))
    }

    /// Queue a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    /// Queue an outcome on a shared script.
    pub fn push(&self, outcome: Result<RawResponse, TransportError>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(outcome);
        }
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().map(|o| o.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let next = self
            .outcomes
            .lock()
            .map_err(|e| TransportError::Request(e.to_string()))?
            .pop_front();
        next.unwrap_or_else(|| {
            Err(TransportError::Request(format!(
                "no scripted response for {} {}",
                request.method.as_str(),
                request.path
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FilePart;
    use serde_json::json;
    use std::time::Duration;

    // === Scripted transport ===

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let transport = ScriptedTransport::new()
            .respond_json(200, json!([1]))
            .fail(TransportError::Timeout);

        let first = transport.send(&ApiRequest::get("/goods")).await.unwrap();
        assert_eq!(first.status, 200);
        assert!(matches!(
            transport.send(&ApiRequest::get("/goods")).await,
            Err(TransportError::Timeout)
        ));
        assert!(transport.send(&ApiRequest::get("/goods")).await.is_err());
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.remaining(), 0);
    }

    // === Request building ===

    #[test]
    fn test_build_request_url_and_query() {
        let transport = ReqwestTransport::new(ApiConfig::new("http://localhost:8080/api")).unwrap();
        let req = ApiRequest::get("/goods/search/price")
            .query("minPrice", 10)
            .query("maxPrice", 20)
            .header("X-Trace", "1");
        let built = transport.build(&req).unwrap().build().unwrap();
        assert_eq!(
            built.url().as_str(),
            "http://localhost:8080/api/goods/search/price?minPrice=10&maxPrice=20"
        );
        assert_eq!(*built.method(), http::Method::GET);
        assert_eq!(built.headers().get("X-Trace").unwrap(), "1");
    }

    #[test]
    fn test_build_request_timeout_override() {
        let transport = ReqwestTransport::new(ApiConfig::default()).unwrap();
        let req = ApiRequest::post("/upload/avatar")
            .multipart(FilePart::new("a.png", vec![0u8; 4]).with_content_type("image/png"))
            .timeout(Duration::from_secs(30));
        let built = transport.build(&req).unwrap().build().unwrap();
        assert_eq!(built.timeout(), Some(&Duration::from_secs(30)));
        let content_type = built.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[test]
    fn test_build_request_bad_mime() {
        let transport = ReqwestTransport::new(ApiConfig::default()).unwrap();
        let req = ApiRequest::post("/upload/product")
            .multipart(FilePart::new("a.png", vec![]).with_content_type("not a mime"));
        assert!(transport.build(&req).is_err());
    }
}
