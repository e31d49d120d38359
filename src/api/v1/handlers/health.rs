/*
 * Responsibility
 * - GET /health (疎通用。ログイン不要)
 */
use serde_json::{Value, json};

use crate::api::v1::response::{self, ApiResult};

pub async fn health() -> ApiResult<Value> {
    response::success(json!({"status": "ok"}), None)
}
