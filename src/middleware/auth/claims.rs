//! Bearer トークン検証 → ClaimsIdentity を extensions に入れる
//!
//! - ヘッダが無いリクエストはそのまま通す (identity なし。Operator が必要な handler が 401 にする)
//! - ヘッダがあるのに検証に失敗したら 401
//! - core_context より外側に掛けること

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, claims_middleware))
}

async fn claims_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(auth) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(req).await);
    };

    let token = auth
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or(AppError::Unauthorized)?;

    let identity = match state.claims.verify(token) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(error = %err, "bearer token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

// scheme 名は大文字小文字を区別しない (RFC 7235)
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty()).then_some(token)
}
