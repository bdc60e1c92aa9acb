use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短码到原始 URL 的映射记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl AliasRecord {
    /// 新建记录，last_accessed_at 初始化为创建时间
    pub fn new(short_code: String, original_url: String, now: DateTime<Utc>) -> Self {
        Self {
            short_code,
            original_url,
            created_at: now,
            last_accessed_at: now,
        }
    }

    /// 最后访问时间是否早于截止时间
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_accessed_at < cutoff
    }
}
