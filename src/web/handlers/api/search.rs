//! 名称搜索 API

use std::sync::Arc;

use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};
use tokio::task;

use super::{error_response, ApiError};
use crate::core::NamepackError;
use crate::network::Session;
use crate::web::types::{AppState, SearchRequest, SearchResponse};

/// 搜索名称包
///
/// The blocking fetch runs on the blocking pool; when a newer search finishes first this
/// one answers 409 and leaves the newer result in place.
pub async fn search_names(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let url = request.url;
    tracing::info!("处理搜索请求: {}", url);

    let options = state.options.clone();
    let context = Arc::clone(&state.context);

    let result = task::spawn_blocking(move || {
        let session = Session::new(options.clone())?;
        context.search(&session, &url, &options)
    })
    .await
    .map_err(|e| {
        tracing::error!("搜索任务失败: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "status": "error",
                "error": format!("任务执行失败: {}", e)
            })),
        )
    })?;

    match result {
        Ok(result) => Ok(Json(SearchResponse::from_result(&result))),
        Err(error) => {
            if matches!(error, NamepackError::Superseded(_)) {
                tracing::debug!("{}", error);
            } else {
                tracing::warn!("搜索失败: {}", error);
            }
            Err(error_response(&error))
        }
    }
}

/// 当前结果
pub async fn current_results(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SearchResponse>, ApiError> {
    match state.context.current() {
        Some(result) => Ok(Json(SearchResponse::from_result(&result))),
        None => Err(error_response(&no_results())),
    }
}

pub(crate) fn no_results() -> NamepackError {
    NamepackError::EmptyResult("no search has completed yet".to_string())
}
