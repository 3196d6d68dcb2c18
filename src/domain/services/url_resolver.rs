// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::is_live_status;
use crate::engines::traits::LivenessProbe;
use crate::utils::errors::ScanError;
use crate::utils::url_utils::has_http_scheme;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// URL 解析器
///
/// 将用户输入的主机名或地址规范化为一个可访问的绝对地址
pub struct UrlResolver {
    prober: Arc<dyn LivenessProbe>,
    probe_timeout: Duration,
}

impl UrlResolver {
    pub fn new(prober: Arc<dyn LivenessProbe>, probe_timeout: Duration) -> Self {
        Self {
            prober,
            probe_timeout,
        }
    }

    /// 生成按顺序探测的候选地址
    ///
    /// `https://x`, `http://x`，输入不以 `www.` 开头时再追加 `https://www.x`, `http://www.x`
    pub fn candidates(input: &str) -> Vec<String> {
        let mut candidates = vec![format!("https://{}", input), format!("http://{}", input)];
        if !input.to_ascii_lowercase().starts_with("www.") {
            candidates.push(format!("https://www.{}", input));
            candidates.push(format!("http://www.{}", input));
        }
        candidates
    }

    /// 全部候选失败时使用的确定性回退地址
    pub fn fallback(input: &str) -> String {
        format!("https://{}", input)
    }

    /// 解析输入
    ///
    /// 已带协议的输入原样返回，不做探测；否则返回第一个存活候选的重定向后地址，
    /// 全部失败时返回回退地址。
    pub async fn resolve(&self, input: &str) -> String {
        match self.try_resolve(input).await {
            Ok(url) => url,
            Err(e) => {
                warn!("{}", e);
                Self::fallback(input)
            }
        }
    }

    /// 解析输入，全部候选失败时返回 [`ScanError::ResolutionExhausted`]
    pub async fn try_resolve(&self, input: &str) -> Result<String, ScanError> {
        if has_http_scheme(input) {
            return Ok(input.to_string());
        }

        for candidate in Self::candidates(input) {
            match self.prober.probe(&candidate, self.probe_timeout).await {
                Ok(outcome) if is_live_status(outcome.status_code) => {
                    debug!(
                        "Resolved {} via {} -> {} ({})",
                        input, candidate, outcome.final_url, outcome.status_code
                    );
                    return Ok(outcome.final_url);
                }
                Ok(outcome) => {
                    debug!("Candidate {} answered {}", candidate, outcome.status_code);
                }
                Err(e) => {
                    debug!("Candidate {} failed: {}", candidate, e);
                }
            }
        }

        Err(ScanError::ResolutionExhausted {
            input: input.to_string(),
            fallback: Self::fallback(input),
        })
    }
}
