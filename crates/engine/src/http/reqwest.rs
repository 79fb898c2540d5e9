use async_trait::async_trait;
use url::Url;

use super::{Credentials, PageResponse, PageTransport, TransportError};

pub struct ReqwestTransport {
    client: reqwest::Client,
    session_cookie: Option<String>,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            session_cookie: None,
        }
    }

    /// Cookie header sent only on credentialed requests.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }
}

#[async_trait]
impl PageTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &Url,
        credentials: Credentials,
    ) -> Result<PageResponse, TransportError> {
        let mut builder = self.client.get(url.clone());

        if let (Credentials::Include, Some(cookie)) = (credentials, &self.session_cookie) {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        let response = builder.send().await?;
        map_response(url, response).await
    }
}

async fn map_response(
    requested: &Url,
    value: reqwest::Response,
) -> Result<PageResponse, TransportError> {
    let status = value.status();
    let redirected = value.url() != requested;
    let body = value.text().await?;

    Ok(PageResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        redirected,
        body,
    })
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        TransportError::new(value.to_string())
    }
}
