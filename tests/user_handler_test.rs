use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

use user_registry_backend::config::database_conf::DatabaseConfig;
use user_registry_backend::repository::user_repo::SqliteUserRepository;
use user_registry_backend::router::user_router::user_router;
use user_registry_backend::service::user_service::UserServiceImpl;

async fn setup_app() -> Router {
    let config = DatabaseConfig {
        path: PathBuf::from(":memory:"),
        max_connections: 1,
    };
    let repo = Arc::new(
        SqliteUserRepository::new(&config)
            .await
            .expect("open in-memory database"),
    );
    repo.init_schema().await.expect("init schema");
    let service = Arc::new(UserServiceImpl::new(repo));
    Router::new().merge(user_router(service))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(app: &Router, full_name: &str, mob_num: &str, pan_num: &str, manager_id: &str) -> Value {
    let body = json!({
        "full_name": full_name,
        "mob_num": mob_num,
        "pan_num": pan_num,
        "manager_id": manager_id,
    });
    let resp = app.clone().oneshot(post_json("/create_user", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

async fn list_users(app: &Router, uri: &str) -> Vec<Value> {
    let resp = app.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["users"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_create_user_returns_fresh_user_id() {
    let app = setup_app().await;

    let first = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    assert_eq!(first["message"], "User created successfully");
    let first_id = first["user_id"].as_str().expect("user_id missing");
    uuid::Uuid::parse_str(first_id).expect("user_id is not a uuid");

    let second = create_user(&app, "Bob", "222", "PAN2", "M1").await;
    let second_id = second["user_id"].as_str().expect("user_id missing");
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_create_user_rejects_missing_or_empty_fields() {
    let app = setup_app().await;

    for field in ["full_name", "mob_num", "pan_num", "manager_id"] {
        let mut body = json!({
            "full_name": "Alice",
            "mob_num": "111",
            "pan_num": "PAN1",
            "manager_id": "M1",
        });
        body.as_object_mut().unwrap().remove(field);
        let resp = app.clone().oneshot(post_json("/create_user", &body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "absent {field}");
        assert_eq!(body_json(resp).await["error"], "Missing required fields");

        let mut body = json!({
            "full_name": "Alice",
            "mob_num": "111",
            "pan_num": "PAN1",
            "manager_id": "M1",
        });
        body.as_object_mut().unwrap().insert(field.to_string(), json!(""));
        let resp = app.clone().oneshot(post_json("/create_user", &body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "empty {field}");
    }

    // None of the rejected requests wrote a row.
    assert!(list_users(&app, "/get_users").await.is_empty());
}

#[tokio::test]
async fn test_create_user_duplicate_mob_num_is_a_storage_error() {
    let app = setup_app().await;

    create_user(&app, "Alice", "111", "PAN1", "M1").await;
    let resp = app
        .clone()
        .oneshot(post_json(
            "/create_user",
            &json!({
                "full_name": "Bob",
                "mob_num": "111",
                "pan_num": "PAN2",
                "manager_id": "M1",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Database error:"), "got: {error}");

    // The failed insert did not add a second row.
    assert_eq!(list_users(&app, "/get_users").await.len(), 1);
}

#[tokio::test]
async fn test_create_user_duplicate_pan_num_is_a_storage_error() {
    let app = setup_app().await;

    create_user(&app, "Alice", "111", "PAN1", "M1").await;
    let resp = app
        .clone()
        .oneshot(post_json(
            "/create_user",
            &json!({
                "full_name": "Bob",
                "mob_num": "222",
                "pan_num": "PAN1",
                "manager_id": "M1",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(list_users(&app, "/get_users").await.len(), 1);
}

#[tokio::test]
async fn test_get_users_supports_equality_filters() {
    let app = setup_app().await;

    let alice = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    create_user(&app, "Bob", "222", "PAN2", "M2").await;

    assert_eq!(list_users(&app, "/get_users").await.len(), 2);

    let by_mob = list_users(&app, "/get_users?mob_num=111").await;
    assert_eq!(by_mob.len(), 1);
    assert_eq!(by_mob[0]["full_name"], "Alice");

    let by_manager = list_users(&app, "/get_users?manager_id=M2").await;
    assert_eq!(by_manager.len(), 1);
    assert_eq!(by_manager[0]["full_name"], "Bob");

    let alice_id = alice["user_id"].as_str().unwrap();
    let combined = list_users(&app, &format!("/get_users?user_id={alice_id}&manager_id=M2")).await;
    assert!(combined.is_empty());

    // An empty parameter imposes no constraint.
    assert_eq!(list_users(&app, "/get_users?mob_num=").await.len(), 2);

    assert!(list_users(&app, "/get_users?user_id=does-not-exist").await.is_empty());
}

#[tokio::test]
async fn test_delete_user_requires_a_selector() {
    let app = setup_app().await;

    let resp = app.clone().oneshot(post_json("/delete_user", &json!({}))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "Provide user_id or mob_num");

    let resp = app
        .clone()
        .oneshot(post_json("/delete_user", &json!({"user_id": "", "mob_num": ""})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_user_returns_404() {
    let app = setup_app().await;
    create_user(&app, "Alice", "111", "PAN1", "M1").await;

    let resp = app
        .clone()
        .oneshot(post_json("/delete_user", &json!({"user_id": "no-such-user"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "User not found");

    assert_eq!(list_users(&app, "/get_users").await.len(), 1);
}

#[tokio::test]
async fn test_delete_by_mob_num_alone() {
    let app = setup_app().await;
    create_user(&app, "Alice", "111", "PAN1", "M1").await;
    create_user(&app, "Bob", "222", "PAN2", "M1").await;

    let resp = app
        .clone()
        .oneshot(post_json("/delete_user", &json!({"mob_num": "222"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "User deleted successfully");

    let remaining = list_users(&app, "/get_users").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["full_name"], "Alice");
}

#[tokio::test]
async fn test_create_delete_lookup_roundtrip() {
    let app = setup_app().await;

    let created = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    let user_id = created["user_id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_json("/delete_user", &json!({"user_id": user_id})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let found = list_users(&app, &format!("/get_users?user_id={user_id}")).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_update_user_changes_only_named_columns() {
    let app = setup_app().await;

    let created = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    create_user(&app, "Bob", "222", "PAN2", "M2").await;
    let user_id = created["user_id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/update_user",
            &json!({
                "user_id": user_id,
                "update_data": {"full_name": "New Name"},
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "User updated successfully");

    let updated = list_users(&app, &format!("/get_users?user_id={user_id}")).await;
    assert_eq!(updated[0]["full_name"], "New Name");
    assert_eq!(updated[0]["mob_num"], "111");
    assert_eq!(updated[0]["pan_num"], "PAN1");
    assert_eq!(updated[0]["manager_id"], "M1");

    let other = list_users(&app, "/get_users?mob_num=222").await;
    assert_eq!(other[0]["full_name"], "Bob");
}

#[tokio::test]
async fn test_update_unknown_user_returns_404() {
    let app = setup_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/update_user",
            &json!({"user_id": "no-such-user", "update_data": {"full_name": "X"}}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "User not found");
}

#[tokio::test]
async fn test_update_rejects_malformed_requests() {
    let app = setup_app().await;

    for body in [
        json!({"update_data": {"full_name": "X"}}),
        json!({"user_id": "some-id"}),
        json!({"user_id": "some-id", "update_data": {}}),
        json!({"user_id": "", "update_data": {"full_name": "X"}}),
    ] {
        let resp = app.clone().oneshot(post_json("/update_user", &body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(resp).await["error"], "Invalid request format");
    }
}

#[tokio::test]
async fn test_update_rejects_unknown_column() {
    let app = setup_app().await;

    let created = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    let user_id = created["user_id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/update_user",
            &json!({
                "user_id": user_id,
                "update_data": {"pan_number": "HACKED"},
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("no such column"), "got: {error}");

    // The statement was rejected before execution, nothing changed.
    let rows = list_users(&app, &format!("/get_users?user_id={user_id}")).await;
    assert_eq!(rows[0]["pan_num"], "PAN1");
}

#[tokio::test]
async fn test_update_can_flip_is_active_without_hiding_the_row() {
    let app = setup_app().await;

    let created = create_user(&app, "Alice", "111", "PAN1", "M1").await;
    let user_id = created["user_id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/update_user",
            &json!({"user_id": user_id, "update_data": {"is_active": false}}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Deactivation is never treated as deletion, the row stays visible.
    let rows = list_users(&app, &format!("/get_users?user_id={user_id}")).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["is_active"], false);
}
