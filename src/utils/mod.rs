//! # 工具模块
//!
//! - `url` - URL处理：末尾斜杠、路径末段、查询参数编码

pub mod url;

pub use self::url::{content_disposition, encode_uri_component, last_path_segment, trim_trailing_slash, Url};
