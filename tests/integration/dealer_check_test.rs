// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{closed_port, get, spawn_site, test_app};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get as get_route;
use axum::Router;
use serde_json::json;

/// 首页带 "Apply Now" 链接，跟进页带预审文案
fn dealer_site() -> Router {
    Router::new()
        .route(
            "/",
            get_route(|| async {
                Html(
                    r#"<html><body>
                        <h1>Main Street Motors</h1>
                        <a href="/specials">Apply Now</a>
                        <a href="/service">Service</a>
                    </body></html>"#,
                )
            }),
        )
        .route(
            "/specials",
            get_route(|| async { Html("<html><body><p>Get pre-approved in minutes</p></body></html>") }),
        )
        .route(
            "/service",
            get_route(|| async { Html("<html><body><p>Oil changes</p></body></html>") }),
        )
}

fn encode(url: &str) -> String {
    urlencoding::encode(url).into_owned()
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    let response = get(test_app(None), "/dealer/check", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn blank_url_is_a_bad_request() {
    let response = get(test_app(None), "/dealer/check?url=%20%20", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn static_match_on_homepage_and_follow_up() {
    let addr = spawn_site(dealer_site()).await;
    let home = format!("http://{}/", addr);

    let uri = format!("/dealer/check?url={}", encode(&home));
    let response = get(test_app(None), &uri, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["inputUrl"], json!(home));
    assert_eq!(body["resolvedUrl"], json!(home));
    assert_eq!(body["siteActive"], json!(true));
    assert_eq!(body["statusCode"], json!(200));
    assert_eq!(body["hasCreditApp"], json!(true));
    assert!(body.get("pages").is_none());

    let hits = body["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(
        hits[0],
        json!({
            "url": home,
            "hasCreditApp": true,
            "matchedKeywords": ["apply now", "apply"]
        })
    );
    assert_eq!(hits[1]["url"], json!(format!("http://{}/specials", addr)));
    assert!(hits[1]["matchedKeywords"]
        .as_array()
        .unwrap()
        .contains(&json!("pre-approved")));
}

#[tokio::test]
async fn bare_host_resolves_to_live_scheme() {
    let addr = spawn_site(dealer_site()).await;

    let uri = format!("/dealer/check?url={}", addr);
    let body = get(test_app(None), &uri, None).await.json();

    // https fails against a plain-text server, so http wins
    assert_eq!(body["inputUrl"], json!(addr.to_string()));
    assert_eq!(body["resolvedUrl"], json!(format!("http://{}/", addr)));
    assert_eq!(body["hasCreditApp"], json!(true));
}

#[tokio::test]
async fn verbose_flag_lists_every_page() {
    let addr = spawn_site(dealer_site()).await;
    let home = format!("http://{}/", addr);

    let uri = format!("/dealer/check?url={}&verbose=true", encode(&home));
    let body = get(test_app(None), &uri, None).await.json();

    let pages = body["pages"].as_array().unwrap();
    // "Service" carries no link trigger, so only /specials is followed
    assert_eq!(pages.len(), 2);
    assert_eq!(body["hits"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_site_reports_error_without_hits() {
    let addr = closed_port().await;
    let home = format!("http://{}/", addr);

    let uri = format!("/dealer/check?url={}&verbose=true", encode(&home));
    let response = get(test_app(None), &uri, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["siteActive"], json!(false));
    assert_eq!(body["statusCode"], json!(null));
    assert_eq!(body["hasCreditApp"], json!(false));
    assert_eq!(body["hits"], json!([]));

    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0]["error"].as_str().unwrap().starts_with("fetch error"));
}

#[tokio::test]
async fn server_error_marks_site_inactive_but_body_is_scanned() {
    let site = Router::new().route(
        "/",
        get_route(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<html><body><a href='/x'>Credit application</a></body></html>"),
            )
                .into_response()
        }),
    );
    let addr = spawn_site(site).await;
    let home = format!("http://{}/", addr);

    let uri = format!("/dealer/check?url={}", encode(&home));
    let body = get(test_app(None), &uri, None).await.json();

    assert_eq!(body["siteActive"], json!(false));
    assert_eq!(body["statusCode"], json!(500));
    assert_eq!(body["hasCreditApp"], json!(true));
}

#[tokio::test]
async fn unparseable_address_is_a_server_error_with_context() {
    let uri = format!("/dealer/check?url={}", encode("http://"));
    let response = get(test_app(None), &uri, None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert_eq!(body["inputUrl"], json!("http://"));
    assert_eq!(body["resolvedUrl"], json!("http://"));
    assert_eq!(body["hasCreditApp"], json!(false));
    assert!(body["error"].is_string());
}
