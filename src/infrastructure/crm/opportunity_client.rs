// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrmSettings;
use crate::infrastructure::crm::token_store::TokenStore;
use crate::utils::errors::CrmError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 同步成功时返回给调用方的固定消息
pub const SYNC_SUCCESS_MESSAGE: &str = "Opportunity synced successfully.";

/// 远程同步结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// 机会同步客户端
///
/// 通过密码模式换取访问令牌，把机会 ID 作为请求头转发到远程动作端点。
/// 令牌失效（401）时刷新一次并重试一次。
pub struct OpportunityClient {
    /// HTTP 客户端
    client: reqwest::Client,
    settings: CrmSettings,
    tokens: TokenStore,
}

impl OpportunityClient {
    pub fn new(settings: CrmSettings) -> Self {
        Self::with_token_store(settings, TokenStore::new())
    }

    pub fn with_token_store(settings: CrmSettings, tokens: TokenStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            settings,
            tokens,
        }
    }

    pub fn settings(&self) -> &CrmSettings {
        &self.settings
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// 向令牌端点换取新的访问令牌并写入缓存
    pub async fn refresh_token(&self) -> Result<String, CrmError> {
        let form = [
            ("grant_type", "password"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("username", self.settings.username.as_str()),
            ("password", self.settings.password.as_str()),
        ];

        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| CrmError::InvalidResponse {
            endpoint: self.settings.token_url.clone(),
            status: status.as_u16(),
            reason: e.to_string(),
        })?;

        self.tokens.replace(token.access_token.clone()).await;
        metrics::counter!("crm_token_refreshes_total").increment(1);
        info!("CRM access token refreshed");

        Ok(token.access_token)
    }

    /// 当前令牌，缓存为空时先刷新
    async fn token(&self) -> Result<String, CrmError> {
        match self.tokens.current().await {
            Some(token) => Ok(token),
            None => self.refresh_token().await,
        }
    }

    async fn post_action(&self, token: &str, opp_id: &str) -> Result<reqwest::Response, CrmError> {
        let response = self
            .client
            .post(&self.settings.action_url)
            .bearer_auth(token)
            .header(self.settings.id_header.as_str(), opp_id)
            .send()
            .await?;
        Ok(response)
    }

    /// 同步一个机会
    ///
    /// # 返回值
    ///
    /// * `Ok(SyncOutcome)` - 远程给出的结论，`success` 仅在状态为 `SUCCESS` 时为真
    /// * `Err(CrmError)` - 网络错误、令牌获取失败或响应无法解析
    pub async fn sync(&self, opp_id: &str) -> Result<SyncOutcome, CrmError> {
        let result = self.sync_inner(opp_id).await;
        let outcome = match &result {
            Ok(outcome) if outcome.success => "success",
            Ok(_) => "failure",
            Err(_) => "error",
        };
        metrics::counter!("crm_sync_requests_total", "outcome" => outcome).increment(1);
        result
    }

    async fn sync_inner(&self, opp_id: &str) -> Result<SyncOutcome, CrmError> {
        let token = self.token().await?;
        let mut response = self.post_action(&token, opp_id).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("CRM rejected the cached token, refreshing and retrying once");
            self.tokens.invalidate().await;
            let token = self.refresh_token().await?;
            response = self.post_action(&token, opp_id).await?;
        }

        let status = response.status();
        let body: ActionResponse = response.json().await.map_err(|e| CrmError::InvalidResponse {
            endpoint: self.settings.action_url.clone(),
            status: status.as_u16(),
            reason: e.to_string(),
        })?;
        debug!("CRM action for {} answered {} {:?}", opp_id, status, body.status);

        if body.status.as_deref() == Some("SUCCESS") {
            Ok(SyncOutcome {
                success: true,
                message: SYNC_SUCCESS_MESSAGE.to_string(),
            })
        } else {
            let remote = body
                .message
                .unwrap_or_else(|| format!("remote status {}", status.as_u16()));
            Ok(SyncOutcome {
                success: false,
                message: format!("Sync failed: {}", remote),
            })
        }
    }
}

#[cfg(test)]
#[path = "opportunity_client_test.rs"]
mod tests;
