use axum::{extract::{Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::dto::user_dto::{
    CreateUserRequest, CreateUserResponse, DeleteUserRequest, MessageResponse, UpdateUserRequest,
    UserFilter, UsersResponse,
};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

// Create User
pub async fn create_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if payload.validate().is_err() {
        return Err(HandlerError::bad_request("Missing required fields"));
    }
    let user_id = service
        .create_user(
            payload.full_name.unwrap_or_default(),
            payload.mob_num.unwrap_or_default(),
            payload.pan_num.unwrap_or_default(),
            payload.manager_id.unwrap_or_default(),
        )
        .await?;
    Ok(Json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user_id,
    }))
}

// Get Users
pub async fn get_users_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Query(filter): Query<UserFilter>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.get_users(filter).await?;
    Ok(Json(UsersResponse { users }))
}

// Delete User
pub async fn delete_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if payload.validate().is_err() {
        return Err(HandlerError::bad_request("Provide user_id or mob_num"));
    }
    let user_id = payload.user_id.filter(|s| !s.is_empty());
    let mob_num = payload.mob_num.filter(|s| !s.is_empty());
    service.delete_user(user_id, mob_num).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

// Update User
pub async fn update_user_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if payload.validate().is_err() {
        return Err(HandlerError::bad_request("Invalid request format"));
    }
    service
        .update_user(
            payload.user_id.unwrap_or_default(),
            payload.update_data.unwrap_or_default(),
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}
