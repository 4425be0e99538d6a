use super::ResourceFetcher;
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// Fetches resources over HTTP(S), by absolute URL or relative to a base URL.
///
/// One request per resource: no timeout, no retry.
pub struct HttpFetcher {
    client: Client,
    base: Option<Url>,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("csvdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base: None })
    }

    pub fn with_base(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid base_url {:?}: {}", base_url, e))
        })?;
        // Without a trailing slash `join` would replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut fetcher = Self::new()?;
        fetcher.base = Some(base);
        Ok(fetcher)
    }

    pub fn is_remote(source: &str) -> bool {
        Url::parse(source)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    fn resolve(&self, name: &str) -> Result<Url> {
        if Self::is_remote(name) {
            return Url::parse(name)
                .map_err(|e| AppError::ValidationError(format!("Invalid URL {}: {}", name, e)));
        }

        let base = self.base.as_ref().ok_or_else(|| {
            AppError::ValidationError(format!("No base URL to resolve {} against", name))
        })?;
        base.join(name)
            .map_err(|e| AppError::ValidationError(format!("Invalid resource name {}: {}", name, e)))
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.resolve(name)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::FetchError(format!("Failed to fetch {}: {}", name, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP error! status: {} for {}", status.as_u16(), name);
            return Err(if status == StatusCode::NOT_FOUND {
                AppError::NotFound(message)
            } else {
                AppError::FetchError(message)
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::FetchError(format!("Failed to read {}: {}", name, e)))?;

        Ok(body.to_vec())
    }

    fn locate(&self, name: &str) -> String {
        self.resolve(name)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| name.to_string())
    }
}
