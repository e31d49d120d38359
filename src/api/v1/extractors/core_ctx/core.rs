use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::RequestContext;
use crate::error::AppError;

/// Handler で RequestContext を受け取るための extractor
/// core_context middleware が `Arc<RequestContext>` を insert 済みである前提
/// 見つからない場合は配線ミスなので 500
pub struct CoreCtx(pub Arc<RequestContext>);

impl<S> FromRequestParts<S> for CoreCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<RequestContext>>()
            .cloned()
            .map(CoreCtx)
            .ok_or_else(|| {
                tracing::error!("request context missing (core_context middleware not applied?)");
                AppError::Internal
            })
    }
}
