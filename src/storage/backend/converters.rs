use crate::storage::AliasRecord;
use migration::entities::alias_record;

pub fn model_to_record(model: alias_record::Model) -> AliasRecord {
    AliasRecord {
        short_code: model.short_code,
        original_url: model.original_url,
        created_at: model.created_at,
        last_accessed_at: model.last_accessed_at,
    }
}

pub fn record_to_active_model(record: &AliasRecord) -> alias_record::ActiveModel {
    use sea_orm::ActiveValue::Set;

    alias_record::ActiveModel {
        short_code: Set(record.short_code.clone()),
        original_url: Set(record.original_url.clone()),
        created_at: Set(record.created_at),
        last_accessed_at: Set(record.last_accessed_at),
    }
}
