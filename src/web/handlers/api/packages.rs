//! 名称包导出与诊断 API

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};

use super::search::no_results;
use super::{error_response, ApiError};
use crate::core::{NamepackError, ResultSet};
use crate::utils::url::content_disposition;
use crate::web::types::{AppState, ExportQuery, GenerationQuery, RejectedResponse};

/// Current result set, checked against the generation the client searched with
fn result_for(state: &AppState, generation: Option<u64>) -> Result<Arc<ResultSet>, ApiError> {
    let result = state
        .context
        .current()
        .ok_or_else(|| error_response(&no_results()))?;

    match generation {
        Some(generation) if generation != result.generation => {
            tracing::debug!(
                "请求的结果集 #{} 已被 #{} 取代",
                generation,
                result.generation
            );
            Err(error_response(&NamepackError::Superseded(generation)))
        }
        _ => Ok(result),
    }
}

/// 下载名称文件
pub async fn export_package_file(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let result = result_for(&state, query.generation)?;
    let file = result
        .export(index, query.original.unwrap_or(false))
        .map_err(|e| error_response(&e))?;

    tracing::info!("导出 {} ({} bytes)", file.filename, file.content.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file.filename)),
        ],
        file.content,
    )
        .into_response())
}

/// 被过滤的条目
pub async fn rejected_entries(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Query(query): Query<GenerationQuery>,
) -> Result<Json<RejectedResponse>, ApiError> {
    let result = result_for(&state, query.generation)?;
    let package = result.package(index).map_err(|e| error_response(&e))?;

    Ok(Json(RejectedResponse::from_package(package)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NamepackOptions, SearchContext};
    use crate::names::package::assemble_sangtacviet_block;
    use crate::sites::SiteVariant;
    use axum::http::StatusCode;

    fn state_with_results() -> Arc<AppState> {
        let context = Arc::new(SearchContext::new());
        let ticket = context.begin();
        context
            .commit(
                ticket,
                "https://sangtacviet.vip/truyen/qidian/1/1/",
                SiteVariant::Sangtacviet,
                vec![assemble_sangtacviet_block(
                    0,
                    "$你好=Xin chào\n$我=tôi\n$朋友你好=xin chào bạn",
                )],
            )
            .unwrap();
        Arc::new(AppState {
            options: NamepackOptions::default(),
            context,
        })
    }

    #[tokio::test]
    async fn test_export_filtered() {
        let response = export_package_file(
            State(state_with_results()),
            Path(0),
            Query(ExportQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("filename*=UTF-8''G%C3%B3i_1_FILTERED_STV.txt"));
    }

    #[tokio::test]
    async fn test_export_unknown_package() {
        let (status, _) = export_package_file(
            State(state_with_results()),
            Path(3),
            Query(ExportQuery {
                original: Some(true),
                generation: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_without_results() {
        let state = Arc::new(AppState {
            options: NamepackOptions::default(),
            context: Arc::new(SearchContext::new()),
        });
        let (status, Json(body)) =
            export_package_file(State(state), Path(0), Query(ExportQuery::default()))
                .await
                .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_rejected_entries() {
        let Json(body) = rejected_entries(
            State(state_with_results()),
            Path(0),
            Query(GenerationQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(body.invalid_count, 2);
        assert_eq!(body.entries[0].line, "我=tôi");
        assert_eq!(body.entries[0].kind, "single_target_script_char");
        assert_eq!(body.entries[1].kind, "no_capitalized_word");
    }

    #[tokio::test]
    async fn test_matching_generation_is_served() {
        let Json(body) = rejected_entries(
            State(state_with_results()),
            Path(0),
            Query(GenerationQuery {
                generation: Some(1),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.invalid_count, 2);
    }

    #[tokio::test]
    async fn test_stale_generation_is_conflict() {
        let state = state_with_results();
        let ticket = state.context.begin();
        state
            .context
            .commit(
                ticket,
                "https://sangtacviet.vip/truyen/qidian/1/2/",
                SiteVariant::Sangtacviet,
                vec![assemble_sangtacviet_block(0, "$林风=Lâm Phong")],
            )
            .unwrap();

        let (status, Json(body)) = export_package_file(
            State(Arc::clone(&state)),
            Path(0),
            Query(ExportQuery {
                original: None,
                generation: Some(1),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");

        let (status, _) = rejected_entries(
            State(Arc::clone(&state)),
            Path(0),
            Query(GenerationQuery {
                generation: Some(1),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);

        let response = export_package_file(
            State(state),
            Path(0),
            Query(ExportQuery {
                original: None,
                generation: Some(2),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
