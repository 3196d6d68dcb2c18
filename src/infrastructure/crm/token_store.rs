// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::RwLock;

/// CRM 访问令牌缓存
///
/// 进程内共享，首次使用时获取，过期后替换。并发刷新是允许的，后写入者覆盖先写入者。
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, token: impl Into<String>) {
        *self.inner.write().await = Some(token.into());
    }

    pub async fn invalidate(&self) {
        *self.inner.write().await = None;
    }
}
