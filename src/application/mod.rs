// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含对外接口的数据传输对象，把领域结果转换为响应格式
pub mod dto;
