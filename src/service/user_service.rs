use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::dto::user_dto::UserFilter;
use crate::model::user::User;
use crate::repository::user_repo::{SqliteUserRepository, UserRepository};
use crate::util::error::ServiceError;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(
        &self,
        full_name: String,
        mob_num: String,
        pan_num: String,
        manager_id: String,
    ) -> Result<String, ServiceError>;
    async fn get_users(&self, filter: UserFilter) -> Result<Vec<User>, ServiceError>;
    async fn delete_user(
        &self,
        user_id: Option<String>,
        mob_num: Option<String>,
    ) -> Result<(), ServiceError>;
    async fn update_user(
        &self,
        user_id: String,
        update_data: HashMap<String, Value>,
    ) -> Result<(), ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<SqliteUserRepository>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<SqliteUserRepository>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, full_name, mob_num, pan_num, manager_id), fields(mob_num = %mob_num))]
    async fn create_user(
        &self,
        full_name: String,
        mob_num: String,
        pan_num: String,
        manager_id: String,
    ) -> Result<String, ServiceError> {
        info!("Creating new user");
        let user_id = Uuid::new_v4().to_string();
        let inserted = self
            .user_repo
            .insert(&user_id, &full_name, &mob_num, &pan_num, &manager_id)
            .await;
        match &inserted {
            Ok(_) => info!("User inserted successfully"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        inserted?;
        Ok(user_id)
    }

    #[instrument(skip(self, filter))]
    async fn get_users(&self, filter: UserFilter) -> Result<Vec<User>, ServiceError> {
        let users = self.user_repo.find(&filter.normalized()).await?;
        info!("Fetched {} user(s)", users.len());
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn delete_user(
        &self,
        user_id: Option<String>,
        mob_num: Option<String>,
    ) -> Result<(), ServiceError> {
        let deleted = self
            .user_repo
            .delete_by_id_or_mob(user_id.as_deref(), mob_num.as_deref())
            .await;
        match &deleted {
            Ok(n) => info!("Deleted {n} user(s)"),
            Err(e) => error!("Failed to delete user: {e}"),
        }
        if deleted? == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, user_id, update_data), fields(user_id = %user_id))]
    async fn update_user(
        &self,
        user_id: String,
        update_data: HashMap<String, Value>,
    ) -> Result<(), ServiceError> {
        let updated = self.user_repo.update_columns(&user_id, &update_data).await;
        match &updated {
            Ok(n) => info!("Updated {n} user(s)"),
            Err(e) => error!("Failed to update user: {e}"),
        }
        // A zero-row update means the target row does not exist; an unchanged
        // existing row is indistinguishable here and reports the same way.
        if updated? == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
