// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{get, test_app};
use axum::http::StatusCode;
use dealerscan::config::settings::CrmSettings;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIRMATION_URL: &str = "https://crm.dealer.test/confirm";
const JSON: Option<&str> = Some("application/json");

fn crm_settings(server: &MockServer) -> CrmSettings {
    CrmSettings {
        token_url: format!("{}/oauth2/token", server.uri()),
        action_url: format!("{}/apexrest/sync", server.uri()),
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        username: "user".to_string(),
        password: "pass".to_string(),
        confirmation_url: CONFIRMATION_URL.to_string(),
        id_header: "oppId".to_string(),
    }
}

async fn crm_with_action(status: &str, message: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t0k3n" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/apexrest/sync"))
        .and(header("Authorization", "Bearer t0k3n"))
        .and(header("oppId", "0061234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": status,
            "message": message
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn json_caller_gets_success_body() {
    let server = crm_with_action("SUCCESS", "done").await;

    let response = get(test_app(Some(crm_settings(&server))), "/sync/0061234", JSON).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "success": true, "message": "Opportunity synced successfully." })
    );
}

#[tokio::test]
async fn browser_caller_is_redirected_to_confirmation() {
    let server = crm_with_action("SUCCESS", "done").await;

    let response = get(test_app(Some(crm_settings(&server))), "/sync/0061234", Some("text/html")).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        "https://crm.dealer.test/confirm?message=Opportunity%20synced%20successfully."
    );
}

#[tokio::test]
async fn remote_failure_carries_remote_message() {
    let server = crm_with_action("ERROR", "Stage is closed").await;

    let response = get(test_app(Some(crm_settings(&server))), "/sync/0061234", JSON).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json(),
        json!({ "success": false, "message": "Sync failed: Stage is closed" })
    );
}

#[tokio::test]
async fn exception_is_prefixed_for_both_response_styles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let response = get(test_app(Some(crm_settings(&server))), "/sync/0061234", JSON).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().starts_with("Exception: "));

    let response = get(test_app(Some(crm_settings(&server))), "/sync/0061234", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response
        .location()
        .starts_with("https://crm.dealer.test/confirm?message=Exception%3A%20"));
}

#[tokio::test]
async fn missing_opportunity_id_is_a_bad_request() {
    let server = MockServer::start().await;

    for uri in ["/sync", "/sync/", "/sync/%20"] {
        let response = get(test_app(Some(crm_settings(&server))), uri, JSON).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn unconfigured_proxy_reports_unavailable() {
    let response = get(test_app(None), "/sync/0061234", JSON).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["success"], json!(false));
}
