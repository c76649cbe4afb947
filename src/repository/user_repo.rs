use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::database_conf::DatabaseConfig;
use crate::dto::user_dto::UserFilter;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

const CREATE_MANAGERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS managers (
    manager_id TEXT PRIMARY KEY,
    is_active BOOLEAN DEFAULT 1
)";

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    mob_num TEXT NOT NULL UNIQUE,
    pan_num TEXT NOT NULL UNIQUE,
    manager_id TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    is_active BOOLEAN DEFAULT 1,
    FOREIGN KEY (manager_id) REFERENCES managers(manager_id)
)";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: &str,
        full_name: &str,
        mob_num: &str,
        pan_num: &str,
        manager_id: &str,
    ) -> RepositoryResult<()>;
    async fn find(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>>;
    async fn delete_by_id_or_mob(
        &self,
        user_id: Option<&str>,
        mob_num: Option<&str>,
    ) -> RepositoryResult<u64>;
    async fn update_columns(
        &self,
        user_id: &str,
        update_data: &HashMap<String, Value>,
    ) -> RepositoryResult<u64>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Opens (creating if missing) the file-backed store. Foreign keys stay
    /// disabled: `manager_id` is a declared reference, never an enforced one.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        Ok(SqliteUserRepository { pool })
    }

    /// Idempotent schema setup. Managers must be created before users so the
    /// foreign-key declaration on users resolves.
    pub async fn init_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_MANAGERS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(
        &self,
        user_id: &str,
        full_name: &str,
        mob_num: &str,
        pan_num: &str,
        manager_id: &str,
    ) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO users (user_id, full_name, mob_num, pan_num, manager_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(full_name)
        .bind(mob_num)
        .bind(pan_num)
        .bind(manager_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE 1=1");
        if let Some(user_id) = &filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id.as_str());
        }
        if let Some(mob_num) = &filter.mob_num {
            query.push(" AND mob_num = ").push_bind(mob_num.as_str());
        }
        if let Some(manager_id) = &filter.manager_id {
            query.push(" AND manager_id = ").push_bind(manager_id.as_str());
        }
        let users = query
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// An absent selector is bound as NULL, and `column = NULL` matches no
    /// row, so a single-selector call deletes by that selector alone.
    async fn delete_by_id_or_mob(
        &self,
        user_id: Option<&str>,
        mob_num: Option<&str>,
    ) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ? OR mob_num = ?")
            .bind(user_id)
            .bind(mob_num)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_columns(
        &self,
        user_id: &str,
        update_data: &HashMap<String, Value>,
    ) -> RepositoryResult<u64> {
        // Column names cannot be bound as parameters, so they are checked
        // against the allow-list before any statement text is assembled.
        for column in update_data.keys() {
            if !User::UPDATABLE_COLUMNS.contains(&column.as_str()) {
                return Err(RepositoryError::database(format!("no such column: {}", column)));
            }
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        {
            let mut fields = query.separated(", ");
            for (column, value) in update_data {
                fields.push(format!("{} = ", column));
                match value {
                    Value::Null => fields.push_bind_unseparated(None::<String>),
                    Value::Bool(b) => fields.push_bind_unseparated(*b),
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            fields.push_bind_unseparated(i)
                        } else {
                            fields.push_bind_unseparated(n.as_f64().unwrap_or_default())
                        }
                    }
                    Value::String(s) => fields.push_bind_unseparated(s.clone()),
                    other => fields.push_bind_unseparated(other.to_string()),
                };
            }
        }
        query.push(", updated_at = CURRENT_TIMESTAMP WHERE user_id = ");
        query.push_bind(user_id);

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
