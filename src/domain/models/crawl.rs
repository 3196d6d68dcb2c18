// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MAX_FOLLOWED_LINKS;
use crate::domain::models::scan_result::PageScanResult;
use std::fmt;
use uuid::Uuid;

/// 单次会话最多访问的页面数（首页 + 跟进链接）
pub const MAX_PAGES_PER_SESSION: usize = 1 + MAX_FOLLOWED_LINKS;

/// 判断状态码是否视为存活
///
/// 2xx–3xx 为成功，4xx 视为可达，5xx 视为不可达
pub fn is_live_status(status_code: u16) -> bool {
    (200..500).contains(&status_code)
}

/// 爬取阶段
///
/// 阶段严格顺序推进，不回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CrawlStage {
    ResolvingUrl,
    ProbingLiveness,
    ScanningHomepage,
    ExtractingLinks,
    ScanningFollowups,
    Aggregating,
    Done,
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlStage::ResolvingUrl => "ResolvingURL",
            CrawlStage::ProbingLiveness => "ProbingLiveness",
            CrawlStage::ScanningHomepage => "ScanningHomepage",
            CrawlStage::ExtractingLinks => "ExtractingLinks",
            CrawlStage::ScanningFollowups => "ScanningFollowups",
            CrawlStage::Aggregating => "Aggregating",
            CrawlStage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// 爬取会话
///
/// 每个请求创建一个，响应发送后销毁
#[derive(Debug, Clone)]
pub struct CrawlSession {
    /// 会话ID，仅用于日志关联
    pub id: Uuid,
    /// 用户原始输入
    pub input_url: String,
    /// 解析后的地址
    pub resolved_url: String,
    /// 站点是否可达
    pub site_reachable: bool,
    /// 存活检测状态码
    pub status_code: Option<u16>,
    /// 当前阶段
    stage: CrawlStage,
    /// 按访问顺序排列的页面结果
    results: Vec<PageScanResult>,
}

impl CrawlSession {
    pub fn new(input_url: impl Into<String>, resolved_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input_url: input_url.into(),
            resolved_url: resolved_url.into(),
            site_reachable: false,
            status_code: None,
            stage: CrawlStage::ResolvingUrl,
            results: Vec::new(),
        }
    }

    pub fn stage(&self) -> CrawlStage {
        self.stage
    }

    /// 推进到下一阶段；回退请求会被忽略
    pub fn advance(&mut self, next: CrawlStage) {
        if next > self.stage {
            tracing::debug!("Session {}: {} -> {}", self.id, self.stage, next);
            self.stage = next;
        }
    }

    /// 记录存活检测结果
    pub fn record_liveness(&mut self, status_code: Option<u16>) {
        self.status_code = status_code;
        self.site_reachable = status_code.is_some_and(is_live_status);
    }

    /// 追加一个页面结果
    ///
    /// # 返回值
    ///
    /// 超过页面上限时返回 `false` 且不追加
    pub fn push_result(&mut self, result: PageScanResult) -> bool {
        if self.results.len() >= MAX_PAGES_PER_SESSION {
            return false;
        }
        self.results.push(result);
        true
    }

    pub fn results(&self) -> &[PageScanResult] {
        &self.results
    }
}
