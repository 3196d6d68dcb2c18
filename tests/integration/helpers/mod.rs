// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::{Extension, Router};
use dealerscan::config::settings::CrmSettings;
use dealerscan::domain::models::keywords::KeywordRegistry;
use dealerscan::domain::services::crawl_service::{CrawlOptions, CrawlService};
use dealerscan::engines::browser_engine::{BrowserEngine, BrowserOptions};
use dealerscan::engines::reqwest_engine::ReqwestEngine;
use dealerscan::infrastructure::crm::opportunity_client::OpportunityClient;
use dealerscan::presentation::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::util::ServiceExt;

/// 测试响应
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }
}

/// 在随机端口上启动一个测试站点
pub async fn spawn_site(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// 一个已释放、无人监听的本地端口
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// 构建被测应用
///
/// 使用真实的 reqwest 引擎；测试环境没有 Chrome，动态渲染关闭
pub fn test_app(crm: Option<CrmSettings>) -> Router {
    let fetcher = Arc::new(ReqwestEngine::default());
    let browser = Arc::new(BrowserEngine::new(BrowserOptions::default()));
    let options = CrawlOptions {
        fetch_timeout: Duration::from_secs(5),
        render_timeout: Duration::from_secs(5),
        probe_timeout: Duration::from_secs(2),
        liveness_timeout: Duration::from_secs(2),
        dynamic_rendering: false,
        ..CrawlOptions::default()
    };
    let service = Arc::new(CrawlService::new(
        fetcher.clone(),
        browser,
        fetcher,
        KeywordRegistry::default(),
        options,
    ));
    let client = crm.map(|settings| Arc::new(OpportunityClient::new(settings)));

    routes::routes()
        .layer(Extension(service))
        .layer(Extension(client))
}

/// 发送一个 GET 请求
pub async fn get(app: Router, uri: &str, accept: Option<&str>) -> TestResponse {
    let mut request = Request::builder().uri(uri);
    if let Some(accept) = accept {
        request = request.header(header::ACCEPT, accept);
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}
