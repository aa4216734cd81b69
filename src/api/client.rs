use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;

/// JSON client for the school backend. Paths are relative to the base url,
/// e.g. `student/classes`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| ApiError::BaseUrl { url: raw.clone(), reason: e.to_string() })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::BaseUrl { url: format!("{}{path}", self.base), reason: e.to_string() })
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%url, ?query, "GET");
        let response = self.http.get(url).query(query).send().await?;
        Self::read(response).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::POST, path, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, body).await
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!(%method, %url, "write request");
        let response = self.http.request(method, url).json(body).send().await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
            warn!(status = status.as_u16(), ?message, "request failed");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("http://localhost:3002/api").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3002/api/");
        assert_eq!(client.url("/student/classes").unwrap().as_str(), "http://localhost:3002/api/student/classes");
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::BaseUrl { .. })));
    }
}
