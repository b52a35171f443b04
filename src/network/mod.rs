//! # 网络模块
//!
//! - `session` - `Fetcher` 抓取接口以及基于 reqwest 的 HTTP 会话

pub mod session;

pub use session::{FetchedPage, Fetcher, Session};
