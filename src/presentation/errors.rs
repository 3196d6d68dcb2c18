// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::application::dto::dealer_check::DealerCheckFailure;
use crate::application::dto::sync::SyncResponseDto;
use crate::utils::errors::{CrmError, SessionError};

/// 请求参数错误
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("missing required query parameter 'url'")]
    MissingUrl,
    #[error("opportunity id is required")]
    MissingOpportunityId,
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按底层错误类型选择状态码与响应体
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<RequestError>() {
            let body = Json(json!({ "error": err.to_string() }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        if let Some(err) = self.0.downcast_ref::<SessionError>() {
            let body = Json(DealerCheckFailure::from(err));
            return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        }

        if let Some(err @ CrmError::NotConfigured) = self.0.downcast_ref::<CrmError>() {
            let body = Json(SyncResponseDto {
                success: false,
                message: err.to_string(),
            });
            return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
