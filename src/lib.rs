//! # Namepack Library
//!
//! 从网络小说站点（Sangtacviet、Wikidich）提取共享的人名词表，过滤低质量条目，
//! 并生成可下载的名称文件和被过滤条目的诊断报告。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、选项、搜索流程和搜索上下文
//! - `sites` - 站点识别和抓取地址解析
//! - `names` - 字符分类、格式处理、逐行校验、名称包组装和导出
//! - `parsers` - HTML解析
//! - `network` - 网络请求
//! - `config` / `env` - 配置文件和环境变量
//! - `utils` - 工具函数
//! - `web` - Web服务器功能（可选）

pub mod config;
pub mod core;
pub mod env;
pub mod names;
pub mod network;
pub mod parsers;
pub mod sites;
pub mod utils;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use self::core::*;
pub use names::{NamePackage, SourceIdentifier};
pub use network::*;
pub use sites::{detect_site, looks_like_supported_url, resolve, SiteVariant};
