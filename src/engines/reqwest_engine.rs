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

use crate::config::settings::DEFAULT_USER_AGENT;
use crate::engines::traits::{
    EngineError, LivenessProbe, ProbeOutcome, ScrapeRequest, ScrapeResponse, ScraperEngine,
};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎，同时负责存活探测
pub struct ReqwestEngine {
    user_agent: String,
}

impl ReqwestEngine {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    // Each request gets a fresh client for cookie isolation
    fn client(&self, timeout: Duration) -> Result<reqwest::Client, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;
        Ok(client)
    }
}

impl Default for ReqwestEngine {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

#[async_trait]
impl ScraperEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResponse)` - 抓取响应，HTTP 错误状态码同样视为成功获取
    /// * `Err(EngineError)` - 超时、DNS、TLS 等网络错误
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError> {
        let client = self.client(request.timeout)?;

        let start = Instant::now();
        let response = client.get(&request.url).send().await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("text/html")
            .to_string();

        let content = response.text().await?;

        Ok(ScrapeResponse {
            status_code,
            final_url,
            content,
            rendered_text: None,
            content_type,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[async_trait]
impl LivenessProbe for ReqwestEngine {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeOutcome, EngineError> {
        let client = self.client(timeout)?;
        let response = client.get(url).send().await?;

        Ok(ProbeOutcome {
            final_url: response.url().to_string(),
            status_code: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
