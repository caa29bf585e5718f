use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A short text update. Posts are immutable once created; there is no
/// edit or delete operation anywhere in the service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    /// Detected language code, when detection was confident
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
}
