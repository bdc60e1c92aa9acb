//! 短码预留
//!
//! 预检查只降低冲突概率，最终唯一性由存储层的 insert 保证。

use std::sync::Arc;

use tracing::debug;

use crate::errors::{LinkerError, Result};
use crate::storage::AliasStore;
use crate::utils::{generate_random_code, normalize_custom};

/// 随机短码的最大尝试次数
pub const MAX_RANDOM_ATTEMPTS: usize = 10;

/// 随机短码长度
pub const RANDOM_CODE_LENGTH: usize = 6;

/// 短码请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasRequest {
    /// 用户指定的短码（未规范化）
    Custom(String),
    Random,
}

impl AliasRequest {
    /// 空白或缺省的自定义名视为随机请求
    pub fn from_custom_name(custom_name: Option<&str>) -> Self {
        match custom_name.map(str::trim) {
            Some(name) if !name.is_empty() => AliasRequest::Custom(name.to_string()),
            _ => AliasRequest::Random,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, AliasRequest::Custom(_))
    }
}

pub struct UniquenessResolver {
    store: Arc<dyn AliasStore>,
}

impl UniquenessResolver {
    pub fn new(store: Arc<dyn AliasStore>) -> Self {
        Self { store }
    }

    /// 返回当前未被占用的规范化短码
    pub async fn reserve(&self, request: &AliasRequest) -> Result<String> {
        match request {
            AliasRequest::Custom(raw) => self.reserve_custom(raw).await,
            AliasRequest::Random => self.reserve_random().await,
        }
    }

    async fn reserve_custom(&self, raw: &str) -> Result<String> {
        let code = normalize_custom(raw)?;

        if self.store.find_by_code(&code).await?.is_some() {
            return Err(LinkerError::alias_taken(format!(
                "Custom name '{}' is already in use",
                code
            )));
        }

        Ok(code)
    }

    async fn reserve_random(&self) -> Result<String> {
        for attempt in 1..=MAX_RANDOM_ATTEMPTS {
            let code = generate_random_code(RANDOM_CODE_LENGTH);
            if self.store.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
            debug!(
                "Random code '{}' collided (attempt {}/{})",
                code, attempt, MAX_RANDOM_ATTEMPTS
            );
        }

        Err(LinkerError::exhausted_retries(format!(
            "Failed to generate a unique short code after {} attempts",
            MAX_RANDOM_ATTEMPTS
        )))
    }
}
