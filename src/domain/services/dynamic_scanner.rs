// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::keywords::KeywordSet;
use crate::domain::models::scan_result::PageScanResult;
use crate::domain::services::static_scanner::{collapse_whitespace, visible_body_text};
use crate::engines::traits::{ScrapeRequest, ScraperEngine};
use crate::utils::errors::ScanError;
use scraper::Html;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 动态扫描器
///
/// 在浏览器中渲染页面，等待网络空闲后只对可见文本做匹配。
/// 仅在静态扫描无命中时使用；结果始终标记为动态渲染。
pub struct DynamicScanner {
    engine: Arc<dyn ScraperEngine>,
    keywords: KeywordSet,
    timeout: Duration,
}

impl DynamicScanner {
    pub fn new(engine: Arc<dyn ScraperEngine>, keywords: KeywordSet, timeout: Duration) -> Self {
        Self {
            engine,
            keywords,
            timeout,
        }
    }

    pub async fn scan(&self, url: &str) -> PageScanResult {
        let request = ScrapeRequest::new(url, self.timeout).with_js();
        let response = match self.engine.scrape(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Rendering {} failed: {}", url, e);
                let kind = if e.is_timeout() { "timeout" } else { "render" };
                metrics::counter!("dealer_page_errors_total", "kind" => kind).increment(1);
                return PageScanResult::failed(url, ScanError::Render(e.to_string()).to_string(), true);
            }
        };

        metrics::counter!("dealer_pages_scanned_total", "mode" => "dynamic").increment(1);

        let text = match response.rendered_text {
            Some(text) => collapse_whitespace(&text).to_lowercase(),
            None => visible_body_text(&Html::parse_document(&response.content)),
        };

        let hits: HashSet<String> = self.keywords.found_in(&text).map(str::to_string).collect();
        debug!(
            "Dynamic scan of {} via {} in {}ms matched {} keyword(s)",
            url,
            self.engine.name(),
            response.response_time_ms,
            hits.len()
        );

        PageScanResult::scanned(url, self.keywords.ordered(&hits), true)
    }
}
