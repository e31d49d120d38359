/*
 * Responsibility
 * - GET /operators/current (ログイン中の操作者)
 * - ambient accessor (provider::*) 経由で Operator / cache / 設定を引く
 */
use chrono::Utc;

use crate::{
    api::v1::response::{self, ApiResult},
    context::{Operator, provider},
    error::AppError,
    services::cache::{CacheClient, ttl_seconds},
};

pub async fn current_operator() -> Result<ApiResult<Operator>, AppError> {
    // 未ログインなら Unauthenticated → 401
    let operator = provider::current_operator()?;

    if let Some(user_id) = operator.user_id.as_deref() {
        record_last_seen(user_id).await?;
    }

    Ok(response::success(operator, None))
}

pub(crate) fn last_seen_key(user_id: &str) -> String {
    format!("operator:last_seen:{user_id}")
}

// 最終アクセス時刻の記録は best-effort (cache の障害でリクエストは落とさない)
async fn record_last_seen(user_id: &str) -> Result<(), AppError> {
    let ttl = provider::configuration()?.cache_default_ttl_seconds;
    let cache = provider::cache()?;
    let logger = provider::get_logger(Some("operators"))?;

    if let Err(err) = cache
        .set_string_with_ttl(
            &last_seen_key(user_id),
            &Utc::now().to_rfc3339(),
            ttl_seconds(ttl),
        )
        .await
    {
        logger.warn(&format!(
            "failed to record last seen on {}: {err}",
            cache.backend_name()
        ));
    }

    Ok(())
}
