use axum::{Router, routing::{get, post}};
use std::sync::Arc;

use crate::handler::user_handler::{
    create_user_handler,
    delete_user_handler,
    get_users_handler,
    update_user_handler,
};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>) -> Router {
    Router::new()
        .route("/create_user", post(create_user_handler))
        .route("/get_users", get(get_users_handler))
        .route("/delete_user", post(delete_user_handler))
        .route("/update_user", post(update_user_handler))
        .with_state(service)
}
