// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use url::Url;

/// 扫描目标
///
/// 只有能解析为绝对 URI 的字符串才是合法目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget(Url);

impl ScanTarget {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

/// 单页扫描结果
///
/// 每访问一个页面创建一次，构造后不可变。
/// 不变量：`has_match` 当且仅当 `matched_keywords` 非空；带错误的结果从不命中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScanResult {
    url: String,
    has_match: bool,
    matched_keywords: Vec<String>,
    used_dynamic_rendering: bool,
    error: Option<String>,
}

impl PageScanResult {
    /// 根据命中关键词构建结果
    ///
    /// # 参数
    ///
    /// * `url` - 页面地址
    /// * `matched_keywords` - 已去重的命中关键词
    /// * `used_dynamic_rendering` - 是否经过动态渲染
    pub fn scanned(
        url: impl Into<String>,
        matched_keywords: Vec<String>,
        used_dynamic_rendering: bool,
    ) -> Self {
        Self {
            url: url.into(),
            has_match: !matched_keywords.is_empty(),
            matched_keywords,
            used_dynamic_rendering,
            error: None,
        }
    }

    /// 构建失败结果，始终不命中
    pub fn failed(
        url: impl Into<String>,
        error: impl Into<String>,
        used_dynamic_rendering: bool,
    ) -> Self {
        Self {
            url: url.into(),
            has_match: false,
            matched_keywords: Vec::new(),
            used_dynamic_rendering,
            error: Some(error.into()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_match(&self) -> bool {
        self.has_match
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    pub fn used_dynamic_rendering(&self) -> bool {
        self.used_dynamic_rendering
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_flag_follows_keywords() {
        let hit = PageScanResult::scanned("https://a.test/", vec!["apply".to_string()], false);
        assert!(hit.has_match());

        let miss = PageScanResult::scanned("https://a.test/", vec![], true);
        assert!(!miss.has_match());
        assert!(miss.used_dynamic_rendering());
    }

    #[test]
    fn test_failed_result_never_matches() {
        let failed = PageScanResult::failed("https://a.test/", "fetch error: timeout", false);
        assert!(!failed.has_match());
        assert!(failed.matched_keywords().is_empty());
        assert_eq!(failed.error(), Some("fetch error: timeout"));
    }

    #[test]
    fn test_scan_target_requires_absolute_uri() {
        assert!(ScanTarget::parse("https://example.com").is_ok());
        assert!(ScanTarget::parse("example.com").is_err());
        assert!(ScanTarget::parse("https://exa mple.com").is_err());
    }
}
