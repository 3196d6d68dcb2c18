// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装 Prometheus 导出器并登记指标说明
///
/// 地址无效或端口被占用时只记录警告，服务照常启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address '{}': {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("dealer_checks_total", "Completed dealer checks");
    describe_counter!(
        "dealer_checks_positive_total",
        "Dealer checks that found a credit application affordance"
    );
    describe_counter!("dealer_pages_scanned_total", "Pages scanned, by mode");
    describe_counter!("dealer_page_errors_total", "Page-local scan failures, by kind");
    describe_histogram!(
        "dealer_check_duration_seconds",
        Unit::Seconds,
        "Wall time of a dealer check"
    );
    describe_counter!("crm_token_refreshes_total", "CRM bearer token refreshes");
    describe_counter!("crm_sync_requests_total", "Opportunity sync requests, by outcome");
}
