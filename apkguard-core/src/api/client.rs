use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, multipart::Form};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{HealthStatus, Statistics};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "APKGUARD_API_URL";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base URL taken from `APKGUARD_API_URL` when set
    pub fn from_env() -> Self {
        Self::default().with_optional_base_url(std::env::var(API_URL_ENV).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn with_optional_base_url(self, base_url: Option<String>) -> Self {
        match base_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => self.with_base_url(url),
            None => self,
        }
    }
}

/// Blocking client for the analysis backend's JSON API
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("apkguard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.send("/api/health", self.http.get(self.url("/api/health")))
    }

    /// Upload one APK as the `apk_file` form field
    pub fn analyze_apk(&self, path: &Path) -> Result<Value, ApiError> {
        let form = Form::new().file("apk_file", path)?;
        self.send(
            "/api/analyze",
            self.http.post(self.url("/api/analyze")).multipart(form),
        )
    }

    pub fn demo_predict(&self, payload: &Value) -> Result<Value, ApiError> {
        self.send(
            "/api/demo-predict",
            self.http.post(self.url("/api/demo-predict")).json(payload),
        )
    }

    /// Upload several APKs, each as an `apk_files` form field
    pub fn batch_analyze<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Value, ApiError> {
        let mut form = Form::new();
        for path in paths {
            form = form.file("apk_files", path.as_ref())?;
        }
        self.send(
            "/api/batch-analyze",
            self.http.post(self.url("/api/batch-analyze")).multipart(form),
        )
    }

    pub fn statistics(&self) -> Result<Statistics, ApiError> {
        self.send("/api/statistics", self.http.get(self.url("/api/statistics")))
    }

    pub fn report(&self, analysis_id: &str) -> Result<Value, ApiError> {
        let endpoint = format!("/api/reports/{analysis_id}");
        self.send(&endpoint, self.http.get(self.url(&endpoint)))
    }

    pub fn train_model(&self) -> Result<Value, ApiError> {
        self.send(
            "/api/train-model",
            self.http.post(self.url("/api/train-model")),
        )
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "api request");

        let response = request.send().map_err(|e| {
            let err = ApiError::from(e);
            warn!(endpoint, error = %err, "api request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), "api returned error status");
            return Err(ApiError::status(status, body));
        }

        Ok(response.json::<T>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_override() {
        let config = ApiConfig::default().with_optional_base_url(Some("http://api.test/".into()));
        assert_eq!(config.base_url, "http://api.test");

        let config = ApiConfig::default().with_optional_base_url(Some("  ".into()));
        assert_eq!(config.base_url, DEFAULT_API_URL);

        let config = ApiConfig::default().with_optional_base_url(None);
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_url_join() {
        let client =
            ApiClient::new(ApiConfig::default().with_base_url("http://api.test/")).unwrap();
        assert_eq!(client.url("/api/health"), "http://api.test/api/health");
    }
}
