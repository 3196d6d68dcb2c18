// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use dealerscan::config::settings::Settings;
use dealerscan::domain::models::keywords::KeywordRegistry;
use dealerscan::domain::services::crawl_service::{CrawlOptions, CrawlService};
use dealerscan::engines::browser_engine::{BrowserEngine, BrowserOptions};
use dealerscan::engines::reqwest_engine::ReqwestEngine;
use dealerscan::infrastructure::crm::opportunity_client::OpportunityClient;
use dealerscan::presentation::routes;
use dealerscan::utils::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting dealerscan...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    dealerscan::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Keyword registry
    let registry = KeywordRegistry::from_overrides(
        settings.scanner.keywords.as_deref(),
        settings.scanner.link_triggers.as_deref(),
    );
    info!(
        "Loaded {} keywords and {} link triggers",
        registry.keywords().len(),
        registry.link_triggers().len()
    );

    // 4. Engines
    let fetcher = Arc::new(ReqwestEngine::new(settings.scanner.user_agent.clone()));
    let browser = Arc::new(BrowserEngine::new(BrowserOptions {
        chrome_executable: settings.scanner.chrome_executable.as_ref().map(PathBuf::from),
        user_agent: Some(settings.scanner.user_agent.clone()),
    }));
    if !settings.scanner.dynamic_rendering {
        warn!("Dynamic rendering disabled, pages without static matches will not be rendered");
    }

    let crawl_service = Arc::new(CrawlService::new(
        fetcher.clone(),
        browser,
        fetcher,
        registry,
        CrawlOptions::from_settings(&settings.scanner),
    ));

    // 5. CRM collaborator
    let opportunity_client = settings
        .crm
        .clone()
        .map(|crm| Arc::new(OpportunityClient::new(crm)));
    if opportunity_client.is_none() {
        warn!("CRM settings missing, /sync will report that it is not configured");
    }

    let app = routes::routes()
        .layer(Extension(crawl_service))
        .layer(Extension(opportunity_client))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
