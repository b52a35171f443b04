//! API 处理器
//!
//! - `search`: 搜索名称包
//! - `packages`: 导出文件和被过滤条目

pub mod packages;
pub mod search;

pub use packages::*;
pub use search::*;

use axum::{http::StatusCode, response::Json};

use crate::core::NamepackError;

/// 处理器的错误响应
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 错误类别对应的 HTTP 状态码
pub fn status_for(error: &NamepackError) -> StatusCode {
    match error {
        NamepackError::UnsupportedSite(_)
        | NamepackError::MalformedUrl(_)
        | NamepackError::ConfigError(_) => StatusCode::BAD_REQUEST,
        NamepackError::EmptyResult(_) | NamepackError::PackageNotFound(_) => StatusCode::NOT_FOUND,
        NamepackError::Superseded(_) => StatusCode::CONFLICT,
        NamepackError::NetworkError(_) | NamepackError::ParseError(_) => StatusCode::BAD_GATEWAY,
        NamepackError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: &NamepackError) -> ApiError {
    (
        status_for(error),
        Json(serde_json::json!({
            "status": "error",
            "error": error.to_string()
        })),
    )
}
