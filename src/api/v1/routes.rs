/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /operators, /sys-users
 * - core_context / claims の middleware は app.rs で v1 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    operators::current_operator,
    sys_users::{get_sys_user, list_sys_users},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/operators/current", get(current_operator))
        .route("/sys-users", get(list_sys_users))
        .route("/sys-users/{user_id}", get(get_sys_user))
}
