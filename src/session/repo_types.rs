use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Session row. Valid while `expires_at` lies in the future and the owning
/// user is not soft-deleted. Expired rows linger until external cleanup;
/// expiry is only ever checked at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String, // sole credential for resolve, never exposed in JSON
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// Token and expiry handed back to the transport adapter, which is solely
/// responsible for encoding them as a cookie or header.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}
