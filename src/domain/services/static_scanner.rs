// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::keywords::KeywordSet;
use crate::domain::models::scan_result::PageScanResult;
use crate::engines::traits::{ScrapeRequest, ScraperEngine};
use crate::utils::errors::ScanError;
use crate::utils::url_utils::normalize_attribute;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("body"));
static INTERACTIVE_SELECTOR: Lazy<Selector> = Lazy::new(|| selector("a, button, form"));

fn selector(css: &str) -> Selector {
    // Only called with the literal selectors above
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css}: {e:?}"))
}

/// 不属于可见文本的元素
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

fn is_hidden(element: &ElementRef<'_>) -> bool {
    HIDDEN_ELEMENTS.contains(&element.value().name())
}

/// 收集元素下的可见文本，跳过脚本和样式，空白折叠为单个空格
///
/// 文本节点直接拼接，与浏览器渲染一致，行内标签不会拆开单词
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut text_content = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_hidden(&ancestor));
        if !hidden {
            text_content.push_str(text);
        }
    }
    collapse_whitespace(&text_content)
}

/// 折叠连续空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 页面正文的可见文本（已小写）
pub fn visible_body_text(document: &Html) -> String {
    document
        .select(&BODY_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default()
        .to_lowercase()
}

/// 在标记中匹配关键词
///
/// 正文文本命中与交互元素（a/button/form 的文本、href、action）命中等价，
/// 所有命中合并为去重集合
pub fn match_markup(html: &str, keywords: &KeywordSet) -> HashSet<String> {
    let document = Html::parse_document(html);
    let mut hits: HashSet<String> = HashSet::new();

    let body_text = visible_body_text(&document);
    hits.extend(keywords.found_in(&body_text).map(str::to_string));

    for element in document.select(&INTERACTIVE_SELECTOR) {
        let text = element_text(element).to_lowercase();
        let href = element
            .value()
            .attr("href")
            .map(normalize_attribute)
            .unwrap_or_default();
        let action = element
            .value()
            .attr("action")
            .map(normalize_attribute)
            .unwrap_or_default();

        for keyword in keywords.iter() {
            if text.contains(keyword) || href.contains(keyword) || action.contains(keyword) {
                hits.insert(keyword.to_string());
            }
        }
    }

    hits
}

/// 静态扫描器
///
/// 抓取原始标记并匹配关键词，不执行页面脚本
pub struct StaticScanner {
    engine: Arc<dyn ScraperEngine>,
    keywords: KeywordSet,
    timeout: Duration,
}

impl StaticScanner {
    pub fn new(engine: Arc<dyn ScraperEngine>, keywords: KeywordSet, timeout: Duration) -> Self {
        Self {
            engine,
            keywords,
            timeout,
        }
    }

    /// 扫描单个页面
    ///
    /// 抓取失败时返回带错误的结果，不会中断会话
    pub async fn scan(&self, url: &str) -> PageScanResult {
        let request = ScrapeRequest::new(url, self.timeout);
        let response = match self.engine.scrape(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Static fetch of {} failed: {}", url, e);
                let kind = if e.is_timeout() { "timeout" } else { "fetch" };
                metrics::counter!("dealer_page_errors_total", "kind" => kind).increment(1);
                return PageScanResult::failed(url, ScanError::Fetch(e.to_string()).to_string(), false);
            }
        };

        metrics::counter!("dealer_pages_scanned_total", "mode" => "static").increment(1);

        let hits = match_markup(&response.content, &self.keywords);
        debug!(
            "Static scan of {} ({} {} via {} in {}ms) matched {} keyword(s)",
            url,
            response.status_code,
            response.content_type,
            self.engine.name(),
            response.response_time_ms,
            hits.len()
        );

        PageScanResult::scanned(url, self.keywords.ordered(&hits), false)
    }
}
