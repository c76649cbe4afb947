use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::model::user::User;

// --- Validated DTOs for request validation ---

/// Presence checks only: an empty string counts as a missing field, and no
/// format validation is applied to the phone or PAN values.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(required, length(min = 1))]
    pub full_name: Option<String>,

    #[validate(required, length(min = 1))]
    pub mob_num: Option<String>,

    #[validate(required, length(min = 1))]
    pub pan_num: Option<String>,

    #[validate(required, length(min = 1))]
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "has_delete_selector"))]
pub struct DeleteUserRequest {
    pub user_id: Option<String>,
    pub mob_num: Option<String>,
}

fn has_delete_selector(req: &DeleteUserRequest) -> Result<(), ValidationError> {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
    if present(&req.user_id) || present(&req.mob_num) {
        Ok(())
    } else {
        Err(ValidationError::new("missing_selector"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "has_update_payload"))]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    pub update_data: Option<HashMap<String, Value>>,
}

fn has_update_payload(req: &UpdateUserRequest) -> Result<(), ValidationError> {
    let has_target = req.user_id.as_deref().is_some_and(|s| !s.is_empty());
    let has_data = req.update_data.as_ref().is_some_and(|m| !m.is_empty());
    if has_target && has_data {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_update"))
    }
}

/// Query-string filters for listing users. Every present parameter becomes an
/// equality predicate; absent (or empty) parameters impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub user_id: Option<String>,
    pub mob_num: Option<String>,
    pub manager_id: Option<String>,
}

impl UserFilter {
    /// Drops empty-string parameters so they behave like absent ones.
    pub fn normalized(self) -> Self {
        UserFilter {
            user_id: self.user_id.filter(|s| !s.is_empty()),
            mob_num: self.mob_num.filter(|s| !s.is_empty()),
            manager_id: self.manager_id.filter(|s| !s.is_empty()),
        }
    }
}

// --- Response DTOs ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}
