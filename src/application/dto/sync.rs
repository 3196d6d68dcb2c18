// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 机会同步的 JSON 响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncResponseDto {
    /// 同步是否成功
    pub success: bool,
    /// 面向用户的结果消息
    pub message: String,
}
