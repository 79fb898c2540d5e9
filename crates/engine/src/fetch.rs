//! Retrieval of a remote work page.

use std::sync::Arc;

use crosspost_types::{FetchRequest, FetchResponse};
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::http::{Credentials, PageResponse, PageTransport};

/// Query flags that make the work page render everything in one response:
/// every chapter, no adult content interstitial, no terms of service gate.
const FULL_WORK_FLAGS: [(&str, &str); 3] = [
    ("view_full_work", "true"),
    ("tos", "yes"),
    ("view_adult", "true"),
];

/// Builds the URL that is actually requested for a work.
///
/// A chapter URL resolves to its whole work, and the full work flags are
/// always set, replacing any value already present.
pub fn normalize_work_url(url: &str) -> Result<Url, FetchError> {
    let work_url = match url.find("/chapters") {
        Some(index) => &url[..index],
        None => url,
    };

    let mut fetch_url =
        Url::parse(work_url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    for (key, value) in FULL_WORK_FLAGS {
        set_query_param(&mut fetch_url, key, value);
    }

    Ok(fetch_url)
}

/// Sets `key` to `value` the way a browser's `URLSearchParams::set` does:
/// the first occurrence is replaced in place, later ones are dropped, and a
/// missing key is appended.
fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut replaced = false;
    let mut pairs = Vec::new();
    for (k, v) in url.query_pairs() {
        if k == key {
            if !replaced {
                pairs.push((k.into_owned(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if !replaced {
        pairs.push((key.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

pub struct WorkFetcher {
    transport: Arc<dyn PageTransport>,
}

impl WorkFetcher {
    pub fn new(transport: Arc<dyn PageTransport>) -> Self {
        Self { transport }
    }

    /// Fetches the raw HTML of the work at `url`.
    ///
    /// The first attempt is anonymous. A redirect means the work is only
    /// visible to logged in users, so one more attempt is made with
    /// credentials. There are never more than two attempts.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let fetch_url = normalize_work_url(url)?;

        info!(%fetch_url, "Fetching work");
        let mut response = self.attempt(&fetch_url, Credentials::Omit).await?;

        if response.redirected {
            info!("Work requires login, retrying with credentials");
            response = self.attempt(&fetch_url, Credentials::Include).await?;
        }

        debug!(bytes = response.body.len(), "Fetched work");
        Ok(response.body)
    }

    /// Answers one request from the page fetching message channel.
    pub async fn handle_request(&self, request: FetchRequest) -> FetchResponse {
        match self.fetch(&request.fetch_url).await {
            Ok(html) => FetchResponse::Html(html),
            Err(e) => FetchResponse::error(e.to_string()),
        }
    }

    async fn attempt(
        &self,
        url: &Url,
        credentials: Credentials,
    ) -> Result<PageResponse, FetchError> {
        debug!(%url, %credentials, "Executing HTTP request");

        let response = self
            .transport
            .get(url, credentials)
            .await
            .map_err(|e| FetchError::FetchFailed(e.message))?;

        if !response.is_success() {
            return Err(FetchError::FetchFailed(format!(
                "Error: {} {}",
                response.status, response.status_text
            )));
        }

        Ok(response)
    }
}
