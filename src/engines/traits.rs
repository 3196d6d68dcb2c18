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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    /// 浏览器渲染失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否由超时引起
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => e.is_timeout(),
            EngineError::Timeout(_) => true,
            _ => false,
        }
    }
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
    /// 是否需要JavaScript支持
    pub needs_js: bool,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            needs_js: false,
        }
    }

    pub fn with_js(mut self) -> Self {
        self.needs_js = true;
        self
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 跟随重定向后的最终地址
    pub final_url: String,
    /// 响应内容（HTML）
    pub content: String,
    /// 浏览器渲染后的可见文本，仅动态引擎提供
    pub rendered_text: Option<String>,
    /// 内容类型
    pub content_type: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 抓取引擎特质
#[async_trait]
pub trait ScraperEngine: Send + Sync {
    /// 执行抓取
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

/// 存活探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// 跟随重定向后的最终地址
    pub final_url: String,
    /// 最终状态码
    pub status_code: u16,
}

/// 存活探测特质
///
/// 发起一次跟随重定向的短超时请求
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeOutcome, EngineError>;
}
