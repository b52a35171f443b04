//! Web 服务器模块
//!
//! 通过 HTTP API 提供名称搜索、导出和被过滤条目查询

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::core::{NamepackError, NamepackOptions, SearchContext};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    options: NamepackOptions,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, options: NamepackOptions) -> Self {
        Self { config, options }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> Result<(), NamepackError> {
        self.config.validate()?;

        let app_state = Arc::new(AppState {
            options: self.options.clone(),
            context: Arc::new(SearchContext::new()),
        });

        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(self.config.address())
            .await
            .map_err(|e| NamepackError::IoError(format!("Failed to bind server: {}", e)))?;

        tracing::info!("Web server starting at http://{}", self.config.address());

        axum::serve(listener, app)
            .await
            .map_err(|e| NamepackError::IoError(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
