use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::fixtures::ADMIN_TOKEN;

const ADMIN_HEADER: &str = "x-admin-token";

/// Thin HTTP client for the BootCaster API under test
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request::<()>(Method::GET, path, None, &[]).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    // Admin routes

    pub async fn get_as_admin(&self, path: &str) -> Result<ApiResponse> {
        self.request::<()>(Method::GET, path, None, &[(ADMIN_HEADER, ADMIN_TOKEN)])
            .await
    }

    pub async fn post_as_admin<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(body), &[(ADMIN_HEADER, ADMIN_TOKEN)])
            .await
    }

    pub async fn patch_as_admin<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(Method::PATCH, path, Some(body), &[(ADMIN_HEADER, ADMIN_TOKEN)])
            .await
    }

    // Bearer routes

    pub async fn post_with_auth<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<ApiResponse> {
        let bearer = format!("Bearer {}", token);
        self.request(Method::POST, path, Some(body), &[("authorization", bearer.as_str())])
            .await
    }

    pub async fn patch_with_auth<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<ApiResponse> {
        let bearer = format!("Bearer {}", token);
        self.request(Method::PATCH, path, Some(body), &[("authorization", bearer.as_str())])
            .await
    }

    pub async fn delete_with_auth(&self, path: &str, token: &str) -> Result<ApiResponse> {
        let bearer = format!("Bearer {}", token);
        self.request::<()>(Method::DELETE, path, None, &[("authorization", bearer.as_str())])
            .await
    }

    /// POST an exact byte payload, as webhooks need for signature checks
    pub async fn post_raw(
        &self,
        path: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(Bytes::from(body)), headers)
            .await
    }

    /// JSON request with arbitrary headers
    pub async fn request<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let payload = body
            .map(|b| serde_json::to_vec(b).map(Bytes::from))
            .transpose()?;
        self.send(method, path, payload, headers).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<Bytes>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{}", self.base_url, path));
        if payload.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder.body(Full::new(payload.unwrap_or_default()))?;
        let response = self.client.request(request).await?;

        ApiResponse::read(response).await
    }
}

/// Status, headers and body of one response, with JSON decoded when possible
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl ApiResponse {
    async fn read(response: Response<hyper::body::Incoming>) -> Result<Self> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();
        let body = serde_json::from_slice(&body_bytes).ok();

        Ok(Self {
            status,
            body,
            body_bytes,
            headers,
        })
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {}. Body: {:?}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert the `message` of an error envelope contains `expected`
    pub fn assert_error_message(&self, expected: &str) -> &Self {
        let message = self
            .body
            .as_ref()
            .and_then(|b| b["message"].as_str())
            .unwrap_or_else(|| panic!("No error message in {:?}", self.body));

        assert!(
            message.contains(expected),
            "Expected error message to contain '{}', but got '{}'",
            expected,
            message
        );
        self
    }

    /// The `data` member of an envelope
    pub fn data(&self) -> &Value {
        self.body
            .as_ref()
            .and_then(|b| b.get("data"))
            .unwrap_or_else(|| panic!("No data member in {:?}", self.body))
    }

    pub fn assert_header(&self, name: &str, value: &str) -> &Self {
        let actual = self
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(actual, value, "Header '{}' value mismatch", name);
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.headers.contains_key(name), "Header '{}' not found", name);
        self
    }
}
