//! Read operations for SeaOrmStore

use sea_orm::EntityTrait;
use tracing::debug;

use super::converters::model_to_record;
use super::{SeaOrmStore, retry};
use crate::errors::{LinkerError, Result};
use crate::storage::AliasRecord;

use migration::entities::alias_record;

impl SeaOrmStore {
    pub(super) async fn find_record(&self, code: &str) -> Result<Option<AliasRecord>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("find({})", code), self.retry_policy, || async {
            alias_record::Entity::find_by_id(code).one(db).await
        })
        .await
        .map_err(|e| {
            debug!("Alias lookup failed after retries: {}", e);
            LinkerError::store_operation(format!("Failed to look up alias '{}': {}", code, e))
        })?;

        Ok(model.map(model_to_record))
    }
}
