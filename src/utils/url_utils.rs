// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 是否已带有 http/https 协议前缀（不区分大小写）
pub fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 规范化 HTML 属性值
///
/// 解析器已解码过一次实体，这里只把残留的 `&amp;` 还原为 `&`
pub fn decode_attribute(value: &str) -> String {
    value.replace("&amp;", "&")
}

/// 规范化用于关键词匹配的属性值：解码并小写
pub fn normalize_attribute(value: &str) -> String {
    decode_attribute(value).to_lowercase()
}
