use async_trait::async_trait;
use url::Url;

use super::{Credentials, PageResponse, TransportError};

/// Performs the raw GET requests the work fetcher needs.
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn get(&self, url: &Url, credentials: Credentials)
    -> Result<PageResponse, TransportError>;
}
