// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - URL 解析（url_resolver）：把用户输入规范化为可访问的绝对地址
/// - 静态扫描（static_scanner）：对原始标记做关键词匹配
/// - 动态扫描（dynamic_scanner）：静态无命中时在浏览器中渲染后匹配
/// - 链接提取（link_extractor）：从首页找出值得跟进的链接
/// - 匹配聚合（match_aggregator）：把单页结果归并为会话结论
/// - 爬取服务（crawl_service）：串联以上步骤完成一次检查
pub mod crawl_service;
pub mod dynamic_scanner;
pub mod link_extractor;
pub mod match_aggregator;
pub mod static_scanner;
pub mod url_resolver;
