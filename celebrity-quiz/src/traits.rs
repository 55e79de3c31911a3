use crate::types::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Capability for pulling a raw HTML document off the network.
///
/// Implementations must follow redirects and give up once `timeout` has
/// elapsed. Any non-2xx status is an error.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}
