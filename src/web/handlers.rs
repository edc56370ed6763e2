//! Web 路由处理函数
//!
//! 实现存活探测和快照调试接口的处理逻辑

use super::WebAppState;
use axum::{
    extract::{ConnectInfo, State},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::{error, info};

/// 快照调试接口处理函数
///
/// 按原始字节返回最近一次抓取到的页面；尚未抓取过或读取失败时返回 500。
/// 页面编码未知，因此 Content-Type 不附带 charset。
pub async fn debug_html(State(app_state): State<WebAppState>) -> Response {
    match app_state.snapshot.load().await {
        Ok(Some(body)) => ([(header::CONTENT_TYPE, "text/html")], body).into_response(),
        Ok(None) => {
            error!("页面快照不可用: 尚未抓取过页面");
            (StatusCode::INTERNAL_SERVER_ERROR, "页面快照不可用").into_response()
        }
        Err(e) => {
            error!("读取页面快照失败: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "读取页面快照失败").into_response()
        }
    }
}

/// 存活探测处理函数，任意路径和方法都返回 `OK`
pub async fn ping(
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> &'static str {
    info!(
        "🌐 收到存活探测 {} {}，来源: {}，时间: {}",
        method,
        uri.path(),
        remote_addr,
        chrono::Utc::now().to_rfc3339()
    );
    "OK"
}
