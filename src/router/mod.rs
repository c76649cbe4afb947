pub mod user_router;
