// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scan_result::PageScanResult;
use crate::domain::services::crawl_service::CrawlReport;
use crate::utils::errors::SessionError;
use serde::{Deserialize, Serialize};

/// 站点检查查询参数
#[derive(Debug, Default, Deserialize)]
pub struct DealerCheckQuery {
    /// 待检查的主机名或地址
    pub url: Option<String>,
    /// 为真时响应附带全部页面结果
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// 单页命中
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageHitDto {
    pub url: String,
    pub has_credit_app: bool,
    pub matched_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub used_dynamic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&PageScanResult> for PageHitDto {
    fn from(result: &PageScanResult) -> Self {
        Self {
            url: result.url().to_string(),
            has_credit_app: result.has_match(),
            matched_keywords: result.matched_keywords().to_vec(),
            used_dynamic: result.used_dynamic_rendering(),
            error: result.error().map(str::to_string),
        }
    }
}

/// 站点检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerCheckResponse {
    pub input_url: String,
    pub resolved_url: String,
    pub site_active: bool,
    pub status_code: Option<u16>,
    pub has_credit_app: bool,
    /// 仅包含命中页面
    pub hits: Vec<PageHitDto>,
    /// 全部页面（仅 verbose 时输出）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageHitDto>>,
}

impl DealerCheckResponse {
    pub fn from_report(report: &CrawlReport, verbose: bool) -> Self {
        let session = &report.session;
        Self {
            input_url: session.input_url.clone(),
            resolved_url: session.resolved_url.clone(),
            site_active: session.site_reachable,
            status_code: session.status_code,
            has_credit_app: report.verdict.has_credit_app,
            hits: report.verdict.hits.iter().map(PageHitDto::from).collect(),
            pages: verbose.then(|| session.results().iter().map(PageHitDto::from).collect()),
        }
    }
}

/// 会话失败时的 500 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerCheckFailure {
    pub input_url: String,
    pub resolved_url: String,
    pub error: String,
    pub has_credit_app: bool,
}

impl From<&SessionError> for DealerCheckFailure {
    fn from(err: &SessionError) -> Self {
        Self {
            input_url: err.input_url().to_string(),
            resolved_url: err.resolved_url().to_string(),
            error: err.to_string(),
            has_credit_app: false,
        }
    }
}
