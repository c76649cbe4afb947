use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub full_name: String,
    pub mob_num: String,
    pub pan_num: String,
    pub manager_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub is_active: bool,
}

impl User {
    /// Columns a client is allowed to overwrite through the update operation.
    /// `user_id` is immutable and the timestamps are server-managed.
    pub const UPDATABLE_COLUMNS: &'static [&'static str] =
        &["full_name", "mob_num", "pan_num", "manager_id", "is_active"];
}
