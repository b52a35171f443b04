//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/search", post(search_names))
        .route("/api/results", get(current_results))
        .route("/api/packages/:index/export", get(export_package_file))
        .route("/api/packages/:index/rejected", get(rejected_entries))
}
