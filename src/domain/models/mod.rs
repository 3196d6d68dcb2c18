// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了扫描器的核心业务实体，包括：
/// - 关键词（keywords）：关键词集合、链接触发词集合及注册表
/// - 扫描结果（scan_result）：扫描目标与单页扫描结果
/// - 爬取会话（crawl）：一次检测请求的完整状态
pub mod crawl;
pub mod keywords;
pub mod scan_result;
