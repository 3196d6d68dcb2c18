// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 扫描错误类型
///
/// 除 `ResolutionExhausted` 外均为页面级错误，只记录在对应页面结果中
#[derive(Error, Debug)]
pub enum ScanError {
    /// 所有候选地址探测失败（非致命，使用回退地址）
    #[error("resolution exhausted for '{input}', falling back to {fallback}")]
    ResolutionExhausted { input: String, fallback: String },

    /// 网络、超时、DNS 或 TLS 错误
    #[error("fetch error: {0}")]
    Fetch(String),

    /// 动态渲染失败
    #[error("rendering error: {0}")]
    Render(String),

    /// 无法解析为绝对地址的链接（静默跳过）
    #[error("malformed link '{href}': {reason}")]
    MalformedLink { href: String, reason: String },
}

/// 会话错误类型
///
/// 页面扫描之外的意外失败，携带部分上下文以便返回 500
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("resolved address '{resolved_url}' is not an absolute URL: {reason}")]
    InvalidTarget {
        input_url: String,
        resolved_url: String,
        reason: String,
    },

    #[error("page limit exceeded while recording {url}")]
    PageLimitExceeded {
        input_url: String,
        resolved_url: String,
        url: String,
    },

    #[error("crawl task failed: {reason}")]
    Internal {
        input_url: String,
        resolved_url: String,
        reason: String,
    },
}

impl SessionError {
    pub fn input_url(&self) -> &str {
        match self {
            SessionError::InvalidTarget { input_url, .. }
            | SessionError::PageLimitExceeded { input_url, .. }
            | SessionError::Internal { input_url, .. } => input_url,
        }
    }

    pub fn resolved_url(&self) -> &str {
        match self {
            SessionError::InvalidTarget { resolved_url, .. }
            | SessionError::PageLimitExceeded { resolved_url, .. }
            | SessionError::Internal { resolved_url, .. } => resolved_url,
        }
    }
}

/// CRM 同步错误类型
#[derive(Error, Debug)]
pub enum CrmError {
    /// 未提供 CRM 配置
    #[error("CRM sync is not configured")]
    NotConfigured,

    /// 网络或协议错误
    #[error("CRM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 令牌端点拒绝了凭据
    #[error("token request rejected with status {status}: {body}")]
    TokenRejected { status: u16, body: String },

    /// 远程返回了无法识别的响应
    #[error("unexpected response from {endpoint} (status {status}): {reason}")]
    InvalidResponse {
        endpoint: String,
        status: u16,
        reason: String,
    },
}
