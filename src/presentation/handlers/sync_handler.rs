// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::application::dto::sync::SyncResponseDto;
use crate::infrastructure::crm::opportunity_client::OpportunityClient;
use crate::presentation::errors::{AppError, RequestError};
use crate::utils::errors::CrmError;

/// 把机会同步到 CRM
///
/// `Accept` 含 `application/json` 时返回 JSON，否则重定向到确认页
pub async fn sync_opportunity(
    Extension(client): Extension<Option<Arc<OpportunityClient>>>,
    Path(opp_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let opp_id = opp_id.trim();
    if opp_id.is_empty() {
        return Err(RequestError::MissingOpportunityId.into());
    }
    let client = client.ok_or(CrmError::NotConfigured)?;

    let (status, body) = match client.sync(opp_id).await {
        Ok(outcome) => {
            info!("Opportunity {} sync finished: {}", opp_id, outcome.message);
            let status = if outcome.success {
                StatusCode::OK
            } else {
                StatusCode::BAD_GATEWAY
            };
            (
                status,
                SyncResponseDto {
                    success: outcome.success,
                    message: outcome.message,
                },
            )
        }
        Err(e) => {
            error!("Opportunity {} sync failed: {}", opp_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SyncResponseDto {
                    success: false,
                    message: format!("Exception: {}", e),
                },
            )
        }
    };

    if wants_json(&headers) {
        Ok((status, Json(body)).into_response())
    } else {
        let target = confirmation_link(&client.settings().confirmation_url, &body.message);
        Ok(Redirect::to(&target).into_response())
    }
}

/// 未提供机会 ID 的请求
pub async fn missing_opportunity_id() -> AppError {
    RequestError::MissingOpportunityId.into()
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.to_ascii_lowercase().contains("application/json"))
}

/// 在确认页地址后追加 URL 编码的消息参数
pub fn confirmation_link(base: &str, message: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}message={}",
        base,
        separator,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_confirmation_link_encodes_message() {
        assert_eq!(
            confirmation_link("https://crm.test/done", "Sync failed: locked & busy"),
            "https://crm.test/done?message=Sync%20failed%3A%20locked%20%26%20busy"
        );
        assert_eq!(
            confirmation_link("https://crm.test/done?src=app", "ok"),
            "https://crm.test/done?src=app&message=ok"
        );
    }

    #[test]
    fn test_wants_json_checks_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html, Application/JSON;q=0.9"));
        assert!(wants_json(&headers));
    }
}
