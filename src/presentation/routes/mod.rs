// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{dealer_handler, sync_handler};
use axum::{routing::get, Router};

/// 创建应用路由
///
/// 共享状态通过 `Extension` 层在调用方注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scanner_routes = Router::new().route("/dealer/check", get(dealer_handler::check_dealer));

    let sync_routes = Router::new()
        .route("/sync", get(sync_handler::missing_opportunity_id))
        .route("/sync/", get(sync_handler::missing_opportunity_id))
        .route("/sync/{opp_id}", get(sync_handler::sync_opportunity));

    Router::new()
        .merge(public_routes)
        .merge(scanner_routes)
        .merge(sync_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
