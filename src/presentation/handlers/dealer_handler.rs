// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json, Query};
use std::sync::Arc;
use tracing::error;

use crate::application::dto::dealer_check::{DealerCheckQuery, DealerCheckResponse};
use crate::domain::services::crawl_service::CrawlService;
use crate::presentation::errors::{AppError, RequestError};
use crate::utils::errors::SessionError;

/// 检查经销商站点是否提供信贷申请入口
///
/// 爬取在独立任务中执行；任务崩溃时返回 500 与已知的上下文
pub async fn check_dealer(
    Extension(service): Extension<Arc<CrawlService>>,
    Query(query): Query<DealerCheckQuery>,
) -> Result<Json<DealerCheckResponse>, AppError> {
    let input = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(RequestError::MissingUrl)?
        .to_string();
    let verbose = query.verbose.unwrap_or(false);

    let task_input = input.clone();
    let report = tokio::spawn(async move { service.check_site(&task_input).await })
        .await
        .map_err(|e| {
            error!("Dealer check for '{}' aborted: {}", input, e);
            SessionError::Internal {
                input_url: input.clone(),
                resolved_url: input.clone(),
                reason: e.to_string(),
            }
        })??;

    Ok(Json(DealerCheckResponse::from_report(&report, verbose)))
}
