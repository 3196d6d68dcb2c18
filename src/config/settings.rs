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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 默认浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 单次会话最多跟进的链接数
pub const MAX_FOLLOWED_LINKS: usize = 5;

/// 应用程序配置设置
///
/// 包含服务器、扫描器、指标以及 CRM 协作方等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 扫描器配置
    pub scanner: ScannerSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// CRM 同步配置（可选）
    #[serde(default)]
    pub crm: Option<CrmSettings>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 扫描器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerSettings {
    /// 关键词覆盖列表（逗号分隔的环境变量）
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// 链接触发词覆盖列表
    #[serde(default)]
    pub link_triggers: Option<Vec<String>>,
    /// 页面抓取超时（秒）
    pub fetch_timeout_secs: u64,
    /// 动态渲染超时（秒）
    pub render_timeout_secs: u64,
    /// URL 解析探测超时（秒）
    pub probe_timeout_secs: u64,
    /// 存活检测超时（秒）
    pub liveness_timeout_secs: u64,
    /// 最多跟进的链接数
    pub max_followed_links: usize,
    /// 是否对候选链接去重
    pub dedupe_links: bool,
    /// 是否启用动态渲染回退
    pub dynamic_rendering: bool,
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// Chrome 可执行文件路径
    #[serde(default)]
    pub chrome_executable: Option<String>,
}

impl ScannerSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }

    /// 跟进链接上限，始终不超过 [`MAX_FOLLOWED_LINKS`]
    pub fn followed_link_limit(&self) -> usize {
        self.max_followed_links.min(MAX_FOLLOWED_LINKS)
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

/// CRM 同步配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrmSettings {
    /// OAuth 令牌端点
    pub token_url: String,
    /// 远程同步动作端点
    pub action_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    /// 非 JSON 调用方的确认页地址
    pub confirmation_url: String,
    /// 传递机会 ID 的请求头名称
    #[serde(default = "default_id_header")]
    pub id_header: String,
}

fn default_id_header() -> String {
    "oppId".to_string()
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和 `DEALERSCAN__` 前缀的环境变量加载配置，支持默认值。
    /// `scanner.keywords` 与 `scanner.link_triggers` 接受逗号分隔的列表。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Scanner
            .set_default("scanner.fetch_timeout_secs", 15)?
            .set_default("scanner.render_timeout_secs", 20)?
            .set_default("scanner.probe_timeout_secs", 8)?
            .set_default("scanner.liveness_timeout_secs", 10)?
            .set_default("scanner.max_followed_links", MAX_FOLLOWED_LINKS as i64)?
            .set_default("scanner.dedupe_links", false)?
            .set_default("scanner.dynamic_rendering", true)?
            .set_default("scanner.user_agent", DEFAULT_USER_AGENT)?
            // Metrics
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("DEALERSCAN")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scanner.keywords")
                    .with_list_parse_key("scanner.link_triggers")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
