//! 站点识别与抓取地址解析
//!
//! 根据 URL 判断来源站点（Sangtacviet / Wikidich），并推导实际需要抓取的地址：
//! Sangtacviet 通过抓取代理请求 `namesys.php` 接口，Wikidich 直接抓取页面本身。

use std::fmt;
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::core::{NamepackError, NamepackOptions, NamepackResult};
use crate::utils::url::{encode_uri_component, last_path_segment, trim_trailing_slash, Url};

/// 小说页面路径标记
pub const PATH_MARKER: &str = "/truyen/";

const SANGTACVIET_HOST_FRAGMENTS: &[&str] = &["sangtacviet", "14.225.254.182"];
const WIKIDICH_HOST_FRAGMENTS: &[&str] = &["truyenwikidich", "wikidich"];

/// 支持的站点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteVariant {
    Sangtacviet,
    Wikidich,
}

impl SiteVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteVariant::Sangtacviet => "sangtacviet",
            SiteVariant::Wikidich => "wikidich",
        }
    }

    /// Whether entries are delimited by `$` markers in the raw content
    pub fn uses_marker_escaping(&self) -> bool {
        matches!(self, SiteVariant::Sangtacviet)
    }

    /// Whether lines go through the validator
    pub fn filters_lines(&self) -> bool {
        matches!(self, SiteVariant::Sangtacviet)
    }
}

impl fmt::Display for SiteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 抓取方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchLocator {
    /// JSON from the scraping proxy; `result.div` holds the name blocks
    ProxiedJson { url: String, api_url: String },
    /// Plain HTML page; names live in the element with `element_id`
    Page { url: String, element_id: String },
}

impl FetchLocator {
    pub fn url(&self) -> &str {
        match self {
            FetchLocator::ProxiedJson { url, .. } | FetchLocator::Page { url, .. } => url,
        }
    }
}

/// URL 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub variant: SiteVariant,
    pub locator: FetchLocator,
    /// Title derived from the URL (Wikidich only)
    pub title_slug: Option<String>,
}

/// Detects the site variant by host fragment
pub fn detect_site(url: &str) -> Option<SiteVariant> {
    if SANGTACVIET_HOST_FRAGMENTS.iter().any(|f| url.contains(f)) {
        Some(SiteVariant::Sangtacviet)
    } else if WIKIDICH_HOST_FRAGMENTS.iter().any(|f| url.contains(f)) {
        Some(SiteVariant::Wikidich)
    } else {
        None
    }
}

/// 检查一段文本（例如粘贴或标准输入）是否像支持的小说地址
pub fn looks_like_supported_url(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && text.contains(PATH_MARKER) && detect_site(text).is_some()
}

/// Classifies a URL and derives what to fetch for it.
///
/// Fails before any network activity: `UnsupportedSite` for unknown hosts and
/// `MalformedUrl` when the path marker or the book identifiers are missing.
pub fn resolve(url: &str, options: &NamepackOptions) -> NamepackResult<ResolvedSource> {
    let url = trim_trailing_slash(url.trim());

    let variant = detect_site(url).ok_or_else(|| {
        NamepackError::UnsupportedSite(format!(
            "{url} (only Sangtacviet and Wikidich are supported)"
        ))
    })?;

    if !url.contains(PATH_MARKER) {
        return Err(NamepackError::MalformedUrl(format!(
            "{url} does not contain \"{PATH_MARKER}\""
        )));
    }

    match variant {
        SiteVariant::Sangtacviet => resolve_sangtacviet(url, options),
        SiteVariant::Wikidich => resolve_wikidich(url, options),
    }
}

fn host_pattern() -> &'static Regex {
    static HOST_RE: OnceLock<Regex> = OnceLock::new();
    HOST_RE.get_or_init(|| {
        Regex::new(r"(?im)^(?:https?://)?(?:[^@\n]+@)?(?:www\.)?([^:/\n?]+)")
            .expect("host pattern is a valid regex")
    })
}

fn resolve_sangtacviet(url: &str, options: &NamepackOptions) -> NamepackResult<ResolvedSource> {
    let parts: Vec<&str> = url.split(PATH_MARKER).collect();
    if parts.len() != 2 {
        return Err(NamepackError::MalformedUrl(format!(
            "{url} must contain \"{PATH_MARKER}\" exactly once"
        )));
    }

    let api_host = host_pattern().replace(parts[0], NoExpand(&options.stv_api_host));

    let params: Vec<&str> = parts[1].split('/').collect();
    let book_host = params.first().copied().unwrap_or_default();
    let book_id = params.get(2).copied().unwrap_or_default();

    if book_host.is_empty() || book_id.is_empty() {
        return Err(NamepackError::MalformedUrl(format!(
            "could not find book host or book id in {url}"
        )));
    }

    let api_url = format!("{api_host}/namesys.php?host={book_host}&book={book_id}");
    let proxy_url = format!(
        "{}?url={}&selector=div&scrape=text&pretty=true",
        options.proxy_url,
        encode_uri_component(&api_url)
    );

    tracing::debug!("Sangtacviet API: {}", api_url);

    Ok(ResolvedSource {
        variant: SiteVariant::Sangtacviet,
        locator: FetchLocator::ProxiedJson {
            url: proxy_url,
            api_url,
        },
        title_slug: None,
    })
}

fn resolve_wikidich(url: &str, options: &NamepackOptions) -> NamepackResult<ResolvedSource> {
    let parsed =
        Url::parse(url).map_err(|e| NamepackError::MalformedUrl(format!("{url}: {e}")))?;

    let slug = last_path_segment(&parsed)
        .map(|segment| strip_trailing_token(&segment).to_string())
        .unwrap_or_default();

    Ok(ResolvedSource {
        variant: SiteVariant::Wikidich,
        locator: FetchLocator::Page {
            url: url.to_string(),
            element_id: options.wikidich_element_id.clone(),
        },
        title_slug: Some(slug),
    })
}

/// Drops the last hyphen-delimited token (`abc-def-123` → `abc-def`)
pub fn strip_trailing_token(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((head, _)) => head,
        None => name,
    }
}
