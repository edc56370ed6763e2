//! Web服务器实现
//!
//! 提供HTTP服务器和路由管理

use super::{handlers, WebAppState};
use crate::config::ServerConfig;
use crate::error::{ConfigError, Result};
use crate::snapshot::SnapshotStore;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 创建路由
///
/// `debug_path` 仅匹配 GET（及 HEAD），其余路径和方法一律交给存活探测处理。
pub fn create_router(state: WebAppState, debug_path: &str) -> Router {
    Router::new()
        .route(
            debug_path,
            get(handlers::debug_html).fallback(handlers::ping),
        )
        .fallback(handlers::ping)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 存活探测服务器
pub struct HealthServer {
    /// 配置
    config: ServerConfig,
    /// 应用状态
    state: WebAppState,
}

impl HealthServer {
    /// 创建新的存活探测服务器
    pub fn new(config: ServerConfig, snapshot: Arc<dyn SnapshotStore>) -> Self {
        Self {
            config,
            state: WebAppState::new(snapshot),
        }
    }

    /// 构建路由
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config.debug_path)
    }

    /// 绑定配置中的监听地址
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self
            .config
            .socket_addr()
            .map_err(ConfigError::ValidationError)?;
        let listener = TcpListener::bind(addr).await?;
        Ok(listener)
    }

    /// 绑定地址并运行服务器
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// 在已绑定的监听器上运行服务器
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("🌐 HTTP服务器监听端口 {}", addr.port());
        info!("页面快照地址: http://{}{}", addr, self.config.debug_path);

        let app = self.router();
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        info!("HTTP服务器已关闭");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemorySnapshotStore;
    use axum::body::{to_bytes, Body};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(store: Arc<MemorySnapshotStore>) -> Router {
        create_router(WebAppState::new(store), "/debug-html")
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unmatched_path_returns_ok() {
        let response = app(Arc::new(MemorySnapshotStore::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_any_method_returns_ok() {
        let response = app(Arc::new(MemorySnapshotStore::new()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("ignored"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_non_get_on_debug_path_is_a_ping() {
        let store = Arc::new(MemorySnapshotStore::new());
        let response = app(store)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/debug-html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_debug_html_before_first_fetch() {
        let response = app(Arc::new(MemorySnapshotStore::new()))
            .oneshot(
                Request::builder()
                    .uri("/debug-html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()[axum::http::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_debug_html_returns_snapshot_verbatim() {
        let store = Arc::new(MemorySnapshotStore::new());
        let body = "<html><body><div class=\"pr-buttons\">\n  <button disabled>Book</button>\n</div></body></html>";
        store.store(body.as_bytes()).await.unwrap();

        let response = app(store)
            .oneshot(
                Request::builder()
                    .uri("/debug-html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, body);
    }

    #[tokio::test]
    async fn test_debug_html_returns_raw_bytes() {
        let store = Arc::new(MemorySnapshotStore::new());
        let body: &[u8] = b"<html><body>Caf\xE9</body></html>";
        store.store(body).await.unwrap();

        let response = app(store)
            .oneshot(
                Request::builder()
                    .uri("/debug-html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], body);
    }

    #[tokio::test]
    async fn test_debug_path_is_exact_match() {
        let store = Arc::new(MemorySnapshotStore::new());
        store.store(b"<p>snapshot</p>").await.unwrap();

        let response = app(store)
            .oneshot(
                Request::builder()
                    .uri("/debug-html/extra")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(body_string(response).await, "OK");
    }
}
