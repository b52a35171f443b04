//! Web 模块的数据类型定义

use std::sync::Arc;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{NamepackOptions, ResultSet, SearchContext};
use crate::names::package::PREVIEW_LINES;
use crate::names::validator::ValidationStats;
use crate::names::NamePackage;
use crate::sites::SiteVariant;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub options: NamepackOptions,
    pub context: Arc<SearchContext>,
}

/// 搜索请求
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub url: String,
}

/// 导出参数
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub original: Option<bool>,
    /// Generation returned by the search this request belongs to
    pub generation: Option<u64>,
}

/// 结果集版本参数
#[derive(Debug, Default, Deserialize)]
pub struct GenerationQuery {
    pub generation: Option<u64>,
}

/// 校验统计摘要
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub total_lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub acceptance_rate: f32,
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl StatsSummary {
    pub fn new(stats: &ValidationStats) -> Self {
        Self {
            total_lines: stats.total_lines,
            accepted: stats.accepted,
            rejected: stats.rejected,
            acceptance_rate: stats.acceptance_rate(),
            by_reason: stats
                .reason_counts()
                .into_iter()
                .map(|(kind, count)| (kind.as_str(), count))
                .collect(),
        }
    }
}

/// 名称包摘要
#[derive(Debug, Serialize)]
pub struct PackageSummary {
    pub index: usize,
    pub title: String,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub offers_original: bool,
    pub preview: Vec<String>,
    pub has_more: bool,
}

impl PackageSummary {
    pub fn new(index: usize, package: &NamePackage) -> Self {
        let preview = package.preview(PREVIEW_LINES);
        Self {
            index,
            title: package.title().to_string(),
            valid_count: package.valid_count(),
            invalid_count: package.invalid_count(),
            offers_original: package.offers_original(),
            preview: preview.lines.iter().map(|line| line.to_string()).collect(),
            has_more: preview.has_more,
        }
    }
}

/// 搜索响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub generation: u64,
    pub site: SiteVariant,
    pub source_url: String,
    pub fetched_at: String,
    pub total_valid: usize,
    pub total_invalid: usize,
    pub stats: StatsSummary,
    pub packages: Vec<PackageSummary>,
}

impl SearchResponse {
    pub fn from_result(result: &ResultSet) -> Self {
        Self {
            status: "success",
            generation: result.generation,
            site: result.site,
            source_url: result.source_url.clone(),
            fetched_at: result.fetched_at_rfc3339(),
            total_valid: result.total_valid(),
            total_invalid: result.total_invalid(),
            stats: StatsSummary::new(&result.stats()),
            packages: result
                .packages()
                .iter()
                .enumerate()
                .map(|(index, package)| PackageSummary::new(index, package))
                .collect(),
        }
    }
}

/// 被过滤条目
#[derive(Debug, Serialize)]
pub struct RejectedEntry {
    pub line: String,
    pub reason: String,
    pub kind: &'static str,
}

/// 被过滤条目响应
#[derive(Debug, Serialize)]
pub struct RejectedResponse {
    pub status: &'static str,
    pub title: String,
    pub invalid_count: usize,
    pub entries: Vec<RejectedEntry>,
}

impl RejectedResponse {
    pub fn from_package(package: &NamePackage) -> Self {
        Self {
            status: "success",
            title: package.title().to_string(),
            invalid_count: package.invalid_count(),
            entries: package
                .invalid_entries()
                .iter()
                .map(|entry| RejectedEntry {
                    line: entry.line.clone(),
                    reason: entry.reason.to_string(),
                    kind: entry.reason.kind().as_str(),
                })
                .collect(),
        }
    }
}
