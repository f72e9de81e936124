use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored resume profile. `profile_data` holds the serialized `ResumeData`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub profile_data: Value,
    pub target_jd: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
