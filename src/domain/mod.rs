// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：关键词、单页结果与爬取会话
/// - 服务（services）：解析、扫描、链接提取与聚合
///
/// 领域层只通过 `engines` 中的特质访问网络，不依赖具体实现。
pub mod models;
pub mod services;
