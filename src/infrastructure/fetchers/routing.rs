use std::sync::Arc;

use super::http::HttpFetcher;
use super::ResourceFetcher;
use crate::domain::error::Result;
use async_trait::async_trait;

/// Sends absolute http(s) URLs to `remote` and every other name to `local`,
/// so a directory manifest may list remote files too
pub struct RoutingFetcher {
    local: Arc<dyn ResourceFetcher>,
    remote: Arc<dyn ResourceFetcher>,
}

impl RoutingFetcher {
    pub fn new(local: Arc<dyn ResourceFetcher>, remote: Arc<dyn ResourceFetcher>) -> Self {
        Self { local, remote }
    }

    fn pick(&self, name: &str) -> &Arc<dyn ResourceFetcher> {
        if HttpFetcher::is_remote(name) {
            &self.remote
        } else {
            &self.local
        }
    }
}

#[async_trait]
impl ResourceFetcher for RoutingFetcher {
    async fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>> {
        self.pick(name).fetch_bytes(name).await
    }

    fn locate(&self, name: &str) -> String {
        self.pick(name).locate(name)
    }
}
