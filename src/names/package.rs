//! 名称包
//!
//! 把站点返回的原始内容整理成带标题的名称包，并逐行校验、汇总被过滤的条目。

use serde_json::Value;

use super::escaping::strip_escaping;
use super::validator::{validate_block, InvalidEntry};
use crate::core::{NamepackError, NamepackResult};
use crate::parsers::html::{find_element_by_id, get_text_content, page_to_dom};
use crate::sites::SiteVariant;

/// Sangtacviet 名称包标题前缀
pub const PACKAGE_TITLE_PREFIX: &str = "Gói";

/// 默认预览行数
pub const PREVIEW_LINES: usize = 8;

/// 用于生成文件名的来源标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIdentifier {
    /// Zero-based position of the block in the API response
    Ordinal(usize),
    /// Slug derived from the page URL
    Slug(String),
}

/// 名称包（组装完成后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePackage {
    title: String,
    filtered_content: String,
    original_content: Option<String>,
    valid_count: usize,
    invalid_count: usize,
    invalid_entries: Vec<InvalidEntry>,
    site: SiteVariant,
    source: SourceIdentifier,
}

/// 预览
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview<'a> {
    pub lines: Vec<&'a str>,
    pub total: usize,
    pub has_more: bool,
}

impl NamePackage {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Accepted lines joined by newlines, each kept verbatim
    pub fn filtered_content(&self) -> &str {
        &self.filtered_content
    }

    /// Normalized but unfiltered content (Sangtacviet only)
    pub fn original_content(&self) -> Option<&str> {
        self.original_content.as_deref()
    }

    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_count
    }

    pub fn invalid_entries(&self) -> &[InvalidEntry] {
        &self.invalid_entries
    }

    pub fn site(&self) -> SiteVariant {
        self.site
    }

    pub fn source_identifier(&self) -> &SourceIdentifier {
        &self.source
    }

    /// Non-blank lines of the filtered content
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.filtered_content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
    }

    pub fn preview(&self, limit: usize) -> Preview<'_> {
        let total = self.lines().count();
        Preview {
            lines: self.lines().take(limit).collect(),
            total,
            has_more: total > limit,
        }
    }

    /// 是否提供“下载原始名称”
    pub fn offers_original(&self) -> bool {
        self.site == SiteVariant::Sangtacviet && self.invalid_count > 0
    }

    /// Renders every rejected line with its reason, one block per entry.
    pub fn rejection_report(&self) -> String {
        self.invalid_entries
            .iter()
            .map(|entry| format!("{}\n  → {}", entry.line, entry.reason))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Builds one package per block of a Sangtacviet `namesys` response.
///
/// The payload must look like `{"result": {"div": ["...", ...]}}`; a missing or empty list
/// means the novel has no shared names.
pub fn assemble_sangtacviet(payload: &Value) -> NamepackResult<Vec<NamePackage>> {
    let blocks = payload
        .get("result")
        .and_then(|result| result.get("div"))
        .and_then(Value::as_array)
        .filter(|blocks| !blocks.is_empty())
        .ok_or_else(|| {
            NamepackError::EmptyResult("the novel has no shared names".to_string())
        })?;

    let mut packages = Vec::with_capacity(blocks.len());

    for (index, block) in blocks.iter().enumerate() {
        let Some(raw) = block.as_str() else {
            tracing::warn!("skipping non-text block #{} in name response", index);
            continue;
        };
        packages.push(assemble_sangtacviet_block(index, raw));
    }

    if packages.is_empty() {
        return Err(NamepackError::EmptyResult(
            "the name response holds no text blocks".to_string(),
        ));
    }

    Ok(packages)
}

/// Normalizes and validates a single Sangtacviet block
pub fn assemble_sangtacviet_block(index: usize, raw: &str) -> NamePackage {
    let normalized = strip_escaping(raw, SiteVariant::Sangtacviet);
    let validation = validate_block(&normalized);

    tracing::debug!(
        "package #{}: {} accepted, {} rejected",
        index + 1,
        validation.accepted.len(),
        validation.rejected.len()
    );

    NamePackage {
        title: format!("{} {}", PACKAGE_TITLE_PREFIX, index + 1),
        filtered_content: validation.accepted.join("\n"),
        valid_count: validation.accepted.len(),
        invalid_count: validation.rejected.len(),
        invalid_entries: validation.rejected,
        original_content: Some(normalized),
        site: SiteVariant::Sangtacviet,
        source: SourceIdentifier::Ordinal(index),
    }
}

/// Extracts the name list element from a Wikidich page and builds its package.
///
/// `charset` is the encoding announced by the server, if any; without it the page's own
/// `<meta>` declaration decides.
pub fn assemble_wikidich(
    page: &[u8],
    charset: Option<&str>,
    element_id: &str,
    slug: &str,
) -> NamepackResult<NamePackage> {
    let dom = page_to_dom(page, charset)?;

    let node = find_element_by_id(&dom.document, element_id).ok_or_else(|| {
        NamepackError::EmptyResult(format!(
            "name list element \"#{element_id}\" not found on this page"
        ))
    })?;

    package_from_name_list(&get_text_content(&node), slug)
}

/// Wikidich lines are trimmed and kept without filtering
pub fn package_from_name_list(text: &str, slug: &str) -> NamepackResult<NamePackage> {
    let normalized = strip_escaping(text, SiteVariant::Wikidich);
    let lines: Vec<&str> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(NamepackError::EmptyResult(
            "the name list on this page is empty".to_string(),
        ));
    }

    Ok(NamePackage {
        title: slug.to_string(),
        filtered_content: lines.join("\n"),
        original_content: None,
        valid_count: lines.len(),
        invalid_count: 0,
        invalid_entries: Vec::new(),
        site: SiteVariant::Wikidich,
        source: SourceIdentifier::Slug(slug.to_string()),
    })
}
