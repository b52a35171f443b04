use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};

use crate::core::{NamepackError, NamepackOptions, NamepackResult};
use crate::parsers::html::charset_from_content_type;

const DEFAULT_USER_AGENT: &str = concat!("namepack/", env!("CARGO_PKG_VERSION"));

/// 抓取到的页面原始内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    /// Charset from the `Content-Type` header, when the server sent one
    pub charset: Option<String>,
}

/// Fetches raw content for a resolved locator.
///
/// Implementations perform a single attempt: any non-success status or transport failure is
/// a `NetworkError`. Nothing is retried.
pub trait Fetcher {
    fn fetch_text(&self, url: &str) -> NamepackResult<String>;

    fn fetch_json(&self, url: &str) -> NamepackResult<serde_json::Value> {
        let body = self.fetch_text(url)?;
        serde_json::from_str(&body)
            .map_err(|e| NamepackError::ParseError(format!("invalid JSON from {url}: {e}")))
    }

    /// Fetches an HTML page without decoding it
    fn fetch_page(&self, url: &str) -> NamepackResult<FetchedPage> {
        Ok(FetchedPage {
            body: self.fetch_text(url)?.into_bytes(),
            charset: Some("utf-8".to_string()),
        })
    }
}

/// HTTP 会话
pub struct Session {
    client: Client,
    pub options: NamepackOptions,
}

impl Session {
    pub fn new(options: NamepackOptions) -> NamepackResult<Session> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut header_map = HeaderMap::new();
        header_map.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|_| {
                NamepackError::ConfigError(format!("invalid user agent \"{user_agent}\""))
            })?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout))
            .default_headers(header_map)
            .build()
            .map_err(|e| NamepackError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Session { client, options })
    }
}

impl Session {
    fn get(&self, url: &str) -> NamepackResult<Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NamepackError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NamepackError::NetworkError(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        Ok(response)
    }
}

impl Fetcher for Session {
    fn fetch_text(&self, url: &str) -> NamepackResult<String> {
        self.get(url)?
            .text()
            .map_err(|e| NamepackError::NetworkError(format!("failed to read body: {e}")))
    }

    fn fetch_page(&self, url: &str) -> NamepackResult<FetchedPage> {
        let response = self.get(url)?;
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        let body = response
            .bytes()
            .map_err(|e| NamepackError::NetworkError(format!("failed to read body: {e}")))?;

        Ok(FetchedPage {
            body: body.to_vec(),
            charset,
        })
    }
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch_text(&self, url: &str) -> NamepackResult<String> {
        (**self).fetch_text(url)
    }

    fn fetch_json(&self, url: &str) -> NamepackResult<serde_json::Value> {
        (**self).fetch_json(url)
    }

    fn fetch_page(&self, url: &str) -> NamepackResult<FetchedPage> {
        (**self).fetch_page(url)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    fn fetch_text(&self, url: &str) -> NamepackResult<String> {
        (**self).fetch_text(url)
    }

    fn fetch_json(&self, url: &str) -> NamepackResult<serde_json::Value> {
        (**self).fetch_json(url)
    }

    fn fetch_page(&self, url: &str) -> NamepackResult<FetchedPage> {
        (**self).fetch_page(url)
    }
}
