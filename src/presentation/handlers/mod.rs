// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// - 站点检查（dealer_handler）：`GET /dealer/check`
/// - 机会同步（sync_handler）：`GET /sync/{opp_id}`
pub mod dealer_handler;
pub mod sync_handler;
