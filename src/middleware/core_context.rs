//! 全体コンテキストの束縛 (パイプラインの一段)
//!
//! Responsibility:
//! - request parts から RequestContext を組み立て、extensions と task-local に載せる
//! - その上で次の段へ必ず1回だけ渡し、完了まで待つ
//!
//! Notes:
//! - ここではフィルタリング・短絡・エラー変換をしない (素通し)
//! - claims middleware より内側に置くこと (ClaimsIdentity を読むため)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::context::{ClaimsIdentity, RequestContext, provider};
use crate::middleware::http::REQUEST_ID_HEADER;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, core_context_middleware))
}

async fn core_context_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let ctx = Arc::new(RequestContext::new(
        request_id,
        req.method().clone(),
        req.uri().clone(),
        req.extensions().get::<ClaimsIdentity>().cloned(),
        state.services.clone(),
    ));

    // CoreCtx extractor 用
    req.extensions_mut().insert(Arc::clone(&ctx));

    provider::scope(ctx, next.run(req)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Extension, http::StatusCode, routing::get};
    use tokio::task::JoinSet;
    use tower::ServiceExt;

    use crate::context::ContextError;
    use crate::state::AppState;

    fn request(identity: Option<ClaimsIdentity>) -> Request<Body> {
        let mut req = Request::builder()
            .uri("/check")
            .header(REQUEST_ID_HEADER, "rid-1")
            .body(Body::empty())
            .unwrap();
        if let Some(identity) = identity {
            req.extensions_mut().insert(identity);
        }
        req
    }

    #[tokio::test]
    async fn forwards_exactly_once_and_binds_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = AppState::for_tests();

        async fn counted(Extension(calls): Extension<Arc<AtomicUsize>>) -> String {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            let ctx = provider::current_request_context().unwrap();
            ctx.request_id.clone().unwrap_or_default()
        }

        let app = apply(Router::new().route("/check", get(counted)), state.clone())
            .layer(Extension(Arc::clone(&calls)))
            .with_state(state);

        let res = app.oneshot(request(None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"rid-1");

        // リクエストが終われば束縛は外れている
        assert_eq!(
            provider::current_request_context().map(|_| ()),
            Err(ContextError::NoActiveRequest)
        );
    }

    #[tokio::test]
    async fn handler_errors_pass_through_untouched() {
        let state = AppState::for_tests();

        async fn teapot() -> StatusCode {
            StatusCode::IM_A_TEAPOT
        }

        let app = apply(Router::new().route("/check", get(teapot)), state.clone()).with_state(state);
        let res = app.oneshot(request(None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_are_isolated() {
        let state = AppState::for_tests();

        async fn whoami() -> String {
            let mut seen = Vec::new();
            for _ in 0..4 {
                seen.push(provider::current_operator().unwrap().user_id.unwrap_or_default());
                tokio::task::yield_now().await;
            }
            seen.join(",")
        }

        let app = apply(Router::new().route("/check", get(whoami)), state.clone()).with_state(state);

        let mut tasks = JoinSet::new();
        for i in 0..32 {
            let app = app.clone();
            tasks.spawn(async move {
                let identity = ClaimsIdentity::new("Bearer").with_claim("sid", format!("u{i}"));
                let res = app.oneshot(request(Some(identity))).await.unwrap();
                let body = axum::body::to_bytes(res.into_body(), usize::MAX)
                    .await
                    .unwrap();
                (i, String::from_utf8(body.to_vec()).unwrap())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (i, body) = joined.unwrap();
            let expected = vec![format!("u{i}"); 4].join(",");
            assert_eq!(body, expected);
        }
    }

    #[tokio::test]
    async fn request_without_identity_still_reaches_handler() {
        let state = AppState::for_tests();

        async fn anonymous() -> String {
            match provider::current_operator() {
                Err(ContextError::Unauthenticated) => "anonymous".to_string(),
                other => format!("{other:?}"),
            }
        }

        let app = apply(Router::new().route("/check", get(anonymous)), state.clone()).with_state(state);
        let res = app.oneshot(request(None)).await.unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(&body[..], b"anonymous");
    }
}
