// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::keywords::LinkTriggerSet;
use crate::domain::services::static_scanner::element_text;
use crate::utils::errors::ScanError;
use crate::utils::url_utils::{decode_attribute, resolve_url};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector("a[href]"));
static BASE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector("base[href]"));

fn parse_selector(css: &str) -> Selector {
    // Only called with the literal selectors above
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css}: {e:?}"))
}

/// 链接发现器
///
/// 从首页标记中找出文本或 href 包含触发词的链接
pub struct LinkDiscoverer;

impl LinkDiscoverer {
    /// 提取候选链接
    ///
    /// # 参数
    ///
    /// * `html_content` - 首页HTML内容
    /// * `page_url` - 首页最终地址，无 `<base href>` 时作为解析基准
    /// * `triggers` - 链接触发词
    ///
    /// # 返回值
    ///
    /// 按文档顺序排列的绝对地址，不去重。无法解析的链接被跳过。
    pub fn extract_candidate_links(
        html_content: &str,
        page_url: &Url,
        triggers: &LinkTriggerSet,
    ) -> Vec<String> {
        let document = Html::parse_document(html_content);
        let base = Self::base_url(&document, page_url);
        let mut links = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(raw_href) = element.value().attr("href") else {
                continue;
            };
            let href = decode_attribute(raw_href.trim());
            let text = element_text(element).to_lowercase();

            if !triggers.any_in(&href.to_lowercase()) && !triggers.any_in(&text) {
                continue;
            }

            match Self::absolutize(&base, &href) {
                Ok(url) => links.push(url.to_string()),
                Err(e) => debug!("Skipping link: {}", e),
            }
        }

        links
    }

    /// 文档中的 `<base href>`，缺失或无法解析时使用页面地址
    fn base_url(document: &Html, page_url: &Url) -> Url {
        document
            .select(&BASE_SELECTOR)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| resolve_url(page_url, &decode_attribute(href.trim())).ok())
            .unwrap_or_else(|| page_url.clone())
    }

    /// 将 href 解析为可抓取的绝对地址
    fn absolutize(base: &Url, href: &str) -> Result<Url, ScanError> {
        let url = resolve_url(base, href).map_err(|e| ScanError::MalformedLink {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ScanError::MalformedLink {
                href: href.to_string(),
                reason: format!("unsupported scheme '{}'", scheme),
            }),
        }
    }
}
