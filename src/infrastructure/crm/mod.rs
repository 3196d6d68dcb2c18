// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// CRM 协作方集成
///
/// - 令牌缓存（token_store）：进程内共享的访问令牌
/// - 机会同步客户端（opportunity_client）：令牌获取、同步请求与一次性重试
pub mod opportunity_client;
pub mod token_store;
