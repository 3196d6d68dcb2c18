// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与外部系统的交互：
/// - CRM 集成（crm）：机会同步代理使用的令牌缓存与 HTTP 客户端
/// - 指标（metrics）：Prometheus 导出器
pub mod crm;
pub mod metrics;
