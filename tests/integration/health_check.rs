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

use super::helpers::{get, test_app};
use axum::http::StatusCode;

/// 健康检查测试
///
/// 验证健康检查端点是否正常工作
#[tokio::test]
async fn health_check_works() {
    let response = get(test_app(None), "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"OK");
}

#[tokio::test]
async fn version_reports_crate_version() {
    let response = get(test_app(None), "/v1/version", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, env!("CARGO_PKG_VERSION").as_bytes());
}
