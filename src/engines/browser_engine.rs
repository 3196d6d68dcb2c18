// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, ScrapeRequest, ScrapeResponse, ScraperEngine};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const VISIBLE_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// 浏览器引擎配置
#[derive(Debug, Clone, Default)]
pub struct BrowserOptions {
    /// Chrome 可执行文件路径，缺省时自动探测
    pub chrome_executable: Option<PathBuf>,
    /// 覆盖默认 User-Agent
    pub user_agent: Option<String>,
}

/// 浏览器引擎
///
/// 基于chromiumoxide实现的动态渲染引擎。每次调用启动独立的浏览器进程，
/// 用完即关闭，不做复用。
pub struct BrowserEngine {
    options: BrowserOptions,
}

impl BrowserEngine {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

/// 渲染后的页面
struct RenderedPage {
    final_url: String,
    html: String,
    text: String,
}

/// 浏览器会话
///
/// 持有一个浏览器进程及其事件处理任务。必须调用 [`BrowserSession::shutdown`] 释放；
/// 如果提前被丢弃，浏览器进程随 `Browser` 的析构一起终止，事件任务在此处中止。
struct BrowserSession {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
}

impl BrowserSession {
    async fn launch(options: &BrowserOptions, request_timeout: Duration) -> Result<Self, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(request_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(user_agent) = &options.user_agent {
            builder = builder.arg(format!("--user-agent={}", user_agent));
        }

        let config = builder.build().map_err(EngineError::Browser)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Browser(format!("failed to launch browser: {}", e)))?;

        // Drive the CDP connection until the browser goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler: Some(handler),
        })
    }

    async fn render(&self, url: &str) -> Result<RenderedPage, EngineError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(format!("failed to open page: {}", e)))?;

        let rendered = Self::navigate_and_read(&page, url).await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        rendered
    }

    async fn navigate_and_read(page: &Page, url: &str) -> Result<RenderedPage, EngineError> {
        let browser_err = |e: chromiumoxide::error::CdpError| EngineError::Browser(e.to_string());

        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(browser_err)?;
        let main_frame = page.mainframe().await.map_err(browser_err)?;
        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(browser_err)?;

        page.goto(url).await.map_err(browser_err)?;

        // A fresh navigation starts with "init"; idle events before it belong to about:blank
        let mut navigation_started = false;
        while let Some(event) = lifecycle.next().await {
            if main_frame.as_ref().is_some_and(|id| *id != event.frame_id) {
                continue;
            }
            match event.name.as_str() {
                "init" => navigation_started = true,
                "networkAlmostIdle" | "networkIdle" if navigation_started => break,
                _ => {}
            }
        }

        let text: String = page
            .evaluate(VISIBLE_TEXT_SCRIPT)
            .await
            .map_err(browser_err)?
            .into_value()
            .map_err(|e| EngineError::Browser(format!("unexpected innerText value: {}", e)))?;
        let html = page.content().await.map_err(browser_err)?;
        let final_url = page
            .url()
            .await
            .map_err(browser_err)?
            .unwrap_or_else(|| url.to_string());

        Ok(RenderedPage {
            final_url,
            html,
            text,
        })
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

#[async_trait]
impl ScraperEngine for BrowserEngine {
    /// 执行浏览器渲染抓取
    ///
    /// 导航到目标页面并等待网络空闲，读取脚本执行后的可见文本。
    /// 整个导航与等待过程受 `request.timeout` 约束；无论成功与否浏览器都会被关闭。
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError> {
        let start = Instant::now();
        let session = BrowserSession::launch(&self.options, request.timeout).await?;

        let outcome = tokio::time::timeout(request.timeout, session.render(&request.url)).await;
        session.shutdown().await;

        let page = outcome.map_err(|_| EngineError::Timeout(request.timeout))??;

        Ok(ScrapeResponse {
            // chromiumoxide does not surface the navigation response here
            status_code: 200,
            final_url: page.final_url,
            content: page.html,
            rendered_text: Some(page.text),
            content_type: "text/html".to_string(),
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
