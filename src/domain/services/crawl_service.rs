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

use crate::config::settings::{ScannerSettings, MAX_FOLLOWED_LINKS};
use crate::domain::models::crawl::{CrawlSession, CrawlStage};
use crate::domain::models::keywords::KeywordRegistry;
use crate::domain::models::scan_result::{PageScanResult, ScanTarget};
use crate::domain::services::dynamic_scanner::DynamicScanner;
use crate::domain::services::link_extractor::LinkDiscoverer;
use crate::domain::services::match_aggregator::{MatchAggregator, SessionVerdict};
use crate::domain::services::static_scanner::StaticScanner;
use crate::domain::services::url_resolver::UrlResolver;
use crate::engines::traits::{LivenessProbe, ScrapeRequest, ScraperEngine};
use crate::utils::errors::SessionError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 爬取参数
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// 页面抓取超时
    pub fetch_timeout: Duration,
    /// 动态渲染超时
    pub render_timeout: Duration,
    /// URL 解析探测超时
    pub probe_timeout: Duration,
    /// 存活检测超时
    pub liveness_timeout: Duration,
    /// 最多跟进的链接数
    pub max_followed_links: usize,
    /// 跟进前是否对候选链接去重
    pub dedupe_links: bool,
    /// 静态无命中时是否进行动态渲染
    pub dynamic_rendering: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            render_timeout: Duration::from_secs(20),
            probe_timeout: Duration::from_secs(8),
            liveness_timeout: Duration::from_secs(10),
            max_followed_links: MAX_FOLLOWED_LINKS,
            dedupe_links: false,
            dynamic_rendering: true,
        }
    }
}

impl CrawlOptions {
    pub fn from_settings(settings: &ScannerSettings) -> Self {
        Self {
            fetch_timeout: settings.fetch_timeout(),
            render_timeout: settings.render_timeout(),
            probe_timeout: settings.probe_timeout(),
            liveness_timeout: settings.liveness_timeout(),
            max_followed_links: settings.followed_link_limit(),
            dedupe_links: settings.dedupe_links,
            dynamic_rendering: settings.dynamic_rendering,
        }
    }
}

/// 一次检查的完整结果
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub session: CrawlSession,
    pub verdict: SessionVerdict,
}

/// 爬取服务
///
/// 依次完成地址解析、存活检测、首页扫描、链接提取与跟进扫描，最后聚合结论。
/// 页面之间严格串行，单页失败只记录在该页结果中。
pub struct CrawlService {
    resolver: UrlResolver,
    prober: Arc<dyn LivenessProbe>,
    fetcher: Arc<dyn ScraperEngine>,
    static_scanner: StaticScanner,
    dynamic_scanner: DynamicScanner,
    registry: KeywordRegistry,
    options: CrawlOptions,
}

impl CrawlService {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - 静态抓取引擎
    /// * `renderer` - 动态渲染引擎
    /// * `prober` - 存活探测器
    /// * `registry` - 关键词与链接触发词
    /// * `options` - 爬取参数
    pub fn new(
        fetcher: Arc<dyn ScraperEngine>,
        renderer: Arc<dyn ScraperEngine>,
        prober: Arc<dyn LivenessProbe>,
        registry: KeywordRegistry,
        mut options: CrawlOptions,
    ) -> Self {
        options.max_followed_links = options.max_followed_links.min(MAX_FOLLOWED_LINKS);

        Self {
            resolver: UrlResolver::new(prober.clone(), options.probe_timeout),
            static_scanner: StaticScanner::new(
                fetcher.clone(),
                registry.keywords().clone(),
                options.fetch_timeout,
            ),
            dynamic_scanner: DynamicScanner::new(
                renderer,
                registry.keywords().clone(),
                options.render_timeout,
            ),
            prober,
            fetcher,
            registry,
            options,
        }
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// 检查站点是否提供信贷/金融申请入口
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlReport)` - 会话及聚合结论
    /// * `Err(SessionError)` - 页面扫描之外的意外失败
    pub async fn check_site(&self, raw_input: &str) -> Result<CrawlReport, SessionError> {
        let started = Instant::now();
        let input = raw_input.trim();

        let resolved = self.resolver.resolve(input).await;
        let target = ScanTarget::parse(&resolved).map_err(|e| SessionError::InvalidTarget {
            input_url: input.to_string(),
            resolved_url: resolved.clone(),
            reason: e.to_string(),
        })?;

        // The resolved address is reported in the same normalized form the homepage is scanned under
        let mut session = CrawlSession::new(input, target.as_str());
        info!(
            "Session {}: checking '{}' as {}",
            session.id, session.input_url, session.resolved_url
        );

        session.advance(CrawlStage::ProbingLiveness);
        self.probe_liveness(&mut session, target.as_str()).await;

        session.advance(CrawlStage::ScanningHomepage);
        let homepage = self.scan_page(target.as_str()).await;
        let homepage_failed = homepage.is_error();
        self.record(&mut session, homepage)?;

        let mut links = Vec::new();
        if homepage_failed {
            debug!(
                "Session {}: homepage scan failed, skipping link extraction",
                session.id
            );
        } else {
            session.advance(CrawlStage::ExtractingLinks);
            links = self.extract_links(&target).await;
        }

        session.advance(CrawlStage::ScanningFollowups);
        for link in links {
            let result = self.scan_page(&link).await;
            self.record(&mut session, result)?;
        }

        session.advance(CrawlStage::Aggregating);
        let verdict = MatchAggregator::aggregate(&session);
        session.advance(CrawlStage::Done);

        metrics::counter!("dealer_checks_total").increment(1);
        if verdict.has_credit_app {
            metrics::counter!("dealer_checks_positive_total").increment(1);
        }
        metrics::histogram!("dealer_check_duration_seconds").record(started.elapsed().as_secs_f64());

        info!(
            "Session {}: {} page(s) scanned, has_credit_app={} in {:?}",
            session.id,
            session.results().len(),
            verdict.has_credit_app,
            started.elapsed()
        );

        Ok(CrawlReport { session, verdict })
    }

    /// 独立于解析器的一次存活检测，失败不终止会话
    async fn probe_liveness(&self, session: &mut CrawlSession, url: &str) {
        match self.prober.probe(url, self.options.liveness_timeout).await {
            Ok(outcome) => {
                debug!(
                    "Session {}: liveness {} -> {} ({})",
                    session.id, url, outcome.final_url, outcome.status_code
                );
                session.record_liveness(Some(outcome.status_code));
            }
            Err(e) => {
                warn!("Session {}: liveness check for {} failed: {}", session.id, url, e);
                session.record_liveness(None);
            }
        }
    }

    /// 扫描单个页面：先静态，静态无命中且无错误时再动态
    async fn scan_page(&self, url: &str) -> PageScanResult {
        let result = self.static_scanner.scan(url).await;
        if result.has_match() || result.is_error() || !self.options.dynamic_rendering {
            return result;
        }

        debug!("No static match on {}, rendering", url);
        self.dynamic_scanner.scan(url).await
    }

    /// 重新抓取首页并提取候选链接
    async fn extract_links(&self, target: &ScanTarget) -> Vec<String> {
        let request = ScrapeRequest::new(target.as_str(), self.options.fetch_timeout);
        let response = match self.fetcher.scrape(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Re-fetching {} for links failed: {}", target.as_str(), e);
                return Vec::new();
            }
        };

        let page_url = url::Url::parse(&response.final_url).unwrap_or_else(|_| target.url().clone());
        let mut links = LinkDiscoverer::extract_candidate_links(
            &response.content,
            &page_url,
            self.registry.link_triggers(),
        );

        if self.options.dedupe_links {
            let mut seen = HashSet::new();
            links.retain(|link| seen.insert(link.clone()));
        }

        debug!(
            "Found {} candidate link(s) on {}, following at most {}",
            links.len(),
            target.as_str(),
            self.options.max_followed_links
        );
        links.truncate(self.options.max_followed_links);
        links
    }

    fn record(&self, session: &mut CrawlSession, result: PageScanResult) -> Result<(), SessionError> {
        let url = result.url().to_string();
        if session.push_result(result) {
            Ok(())
        } else {
            Err(SessionError::PageLimitExceeded {
                input_url: session.input_url.clone(),
                resolved_url: session.resolved_url.clone(),
                url,
            })
        }
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
