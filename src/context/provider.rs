/*
 * Responsibility
 * - どこからでも引ける「全体コンテキスト」(設定・実行環境・現在のリクエスト・操作者・logger・service)
 * - プロセス全体の値 (Config) は起動時に一度だけ登録し、以降は読み取り専用
 * - リクエスト単位の値は tokio の task-local に束縛する (並行リクエスト間で混ざらない)
 *
 * Notes
 * - 束縛は middleware::core_context が行う。scope の外から呼ぶと NoActiveRequest
 * - 引数で渡せる場面では RequestContext (CoreCtx extractor) を直接使う方が良い
 * - tokio::spawn した先には引き継がれない
 */
use std::{future::Future, sync::Arc};

use axum::http::{Method, Uri};
use once_cell::sync::OnceCell;

use super::{ClaimsIdentity, ContextError, Logger, LoggerFactory, Operator, Resolve, Services};
use crate::config::{AppEnv, Config};
use crate::services::cache::CacheClient;

static CONFIGURATION: OnceCell<Arc<Config>> = OnceCell::new();

tokio::task_local! {
    static CURRENT: Arc<RequestContext>;
}

/// 1リクエスト分のコンテキスト
///
/// middleware が request parts から組み立て、以降は読み取りのみ
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub method: Method,
    pub uri: Uri,
    identity: Option<ClaimsIdentity>,
    services: Services,
}

impl RequestContext {
    pub fn new(
        request_id: Option<String>,
        method: Method,
        uri: Uri,
        identity: Option<ClaimsIdentity>,
        services: Services,
    ) -> Self {
        Self {
            request_id,
            method,
            uri,
            identity,
            services,
        }
    }

    pub fn identity(&self) -> Option<&ClaimsIdentity> {
        self.identity.as_ref()
    }

    pub fn operator(&self) -> Result<Operator, ContextError> {
        Operator::from_identity(self.identity.as_ref())
    }

    /// 空白でない名前が渡されたら名前付き logger、それ以外は既定の logger
    pub fn logger(&self, name: Option<&str>) -> Result<Logger, ContextError> {
        let factory = <Services as Resolve<LoggerFactory>>::resolve(&self.services)?;

        Ok(match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => factory.create_logger(name),
            None => factory.default_logger(),
        })
    }

    pub fn service<T>(&self) -> Result<T, ContextError>
    where
        Services: Resolve<T>,
    {
        <Services as Resolve<T>>::resolve(&self.services)
    }
}

/// 起動時に一度だけ呼ぶ。二度目は AlreadyInitialized
pub fn init(config: Arc<Config>) -> Result<(), ContextError> {
    CONFIGURATION
        .set(config)
        .map_err(|_| ContextError::AlreadyInitialized)
}

pub fn configuration() -> Result<Arc<Config>, ContextError> {
    CONFIGURATION
        .get()
        .cloned()
        .ok_or(ContextError::NotInitialized)
}

pub fn hosting_environment() -> Result<AppEnv, ContextError> {
    Ok(configuration()?.app_env)
}

/// `fut` の実行中だけ `ctx` を現在のリクエストとして束縛する
pub async fn scope<F>(ctx: Arc<RequestContext>, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT.scope(ctx, fut).await
}

pub fn current_request_context() -> Result<Arc<RequestContext>, ContextError> {
    CURRENT
        .try_with(Arc::clone)
        .map_err(|_| ContextError::NoActiveRequest)
}

pub fn current_operator() -> Result<Operator, ContextError> {
    current_request_context()?.operator()
}

pub fn get_logger(name: Option<&str>) -> Result<Logger, ContextError> {
    current_request_context()?.logger(name)
}

pub fn get_service<T>() -> Result<T, ContextError>
where
    Services: Resolve<T>,
{
    current_request_context()?.service::<T>()
}

pub fn cache() -> Result<Arc<dyn CacheClient>, ContextError> {
    get_service::<Arc<dyn CacheClient>>()
}

/// テスト用: 既に登録済みなら何もしない
#[cfg(test)]
pub(crate) fn init_for_tests() {
    let _ = init(Arc::new(crate::config::test_config()));
}
