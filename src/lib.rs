// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 对外接口的数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含关键词、扫描结果、爬取会话以及扫描与爬取服务
pub mod domain;

/// 引擎模块
///
/// 静态抓取与浏览器渲染引擎
pub mod engines;

/// 基础设施模块
///
/// CRM 集成与指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由与处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
