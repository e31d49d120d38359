/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → 全体コンテキストへの登録 → 依存生成 (DB / cache / repository)
 * - Router 組み立てと Middleware の適用
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    context::{LoggerFactory, Services, provider},
    middleware,
    repos::sys_user_repo::PgSysUserRepository,
    services::{
        auth::build_claims_verifier,
        cache::{CacheClient, MemoryCache, ValkeyClient},
    },
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG があればそれを優先
    // ex: RUST_LOG=info,skymall_core=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Arc::new(Config::from_env()?);
    provider::init(Arc::clone(&config))?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        provider::hosting_environment()?,
        config.addr
    );

    let state = build_state(Arc::clone(&config)).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_cache(config: &Config) -> Result<Arc<dyn CacheClient>> {
    let cache: Arc<dyn CacheClient> = match config.cache_url.as_deref() {
        Some(url) => Arc::new(ValkeyClient::new(url).await?),
        None => Arc::new(MemoryCache::new()),
    };

    tracing::info!(backend = cache.backend_name(), "cache ready");
    Ok(cache)
}

async fn build_state(config: Arc<Config>) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let services = Services::builder()
        .cache(build_cache(&config).await?)
        .sys_users(Arc::new(PgSysUserRepository::new(db)))
        .loggers(LoggerFactory::default())
        .build();

    let claims = build_claims_verifier(&config)?;

    Ok(AppState::new(config, services, claims))
}

fn build_router(state: AppState, config: &Config) -> Router {
    // 後から layer したものほど外側。claims → core_context の順に通る
    let v1 = api::v1::routes();
    let v1 = middleware::core_context::apply(v1, state.clone());
    let v1 = middleware::auth::claims::apply(v1, state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
