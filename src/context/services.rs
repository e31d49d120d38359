/*
 * Responsibility
 * - リクエストから解決できる service の入れ物 (Services)
 * - 型ごとの解決 (Resolve<T>)。未登録なら ServiceNotFound
 *
 * Notes
 * - 型 ID による動的な lookup はしない。capability ごとにスロットと Resolve 実装を足す
 * - Clone 前提 (中身は Arc)
 */
use std::{any::type_name, fmt, sync::Arc};

use super::{ContextError, LoggerFactory};
use crate::repos::sys_user_repo::SysUserRepository;
use crate::services::cache::CacheClient;

#[derive(Clone, Default)]
pub struct Services {
    cache: Option<Arc<dyn CacheClient>>,
    sys_users: Option<Arc<dyn SysUserRepository>>,
    loggers: LoggerFactory,
}

impl Services {
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("cache", &self.cache.as_ref().map(|c| c.backend_name()))
            .field("sys_users", &self.sys_users.is_some())
            .field("loggers", &self.loggers)
            .finish()
    }
}

#[derive(Default)]
pub struct ServicesBuilder {
    inner: Services,
}

impl ServicesBuilder {
    pub fn cache(mut self, cache: Arc<dyn CacheClient>) -> Self {
        self.inner.cache = Some(cache);
        self
    }

    pub fn sys_users(mut self, repo: Arc<dyn SysUserRepository>) -> Self {
        self.inner.sys_users = Some(repo);
        self
    }

    pub fn loggers(mut self, loggers: LoggerFactory) -> Self {
        self.inner.loggers = loggers;
        self
    }

    pub fn build(self) -> Services {
        self.inner
    }
}

/// capability `T` を Services から取り出す
pub trait Resolve<T> {
    fn resolve(&self) -> Result<T, ContextError>;
}

fn registered<T: Clone>(slot: &Option<T>) -> Result<T, ContextError> {
    slot.clone()
        .ok_or(ContextError::ServiceNotFound(type_name::<T>()))
}

impl Resolve<Arc<dyn CacheClient>> for Services {
    fn resolve(&self) -> Result<Arc<dyn CacheClient>, ContextError> {
        registered(&self.cache)
    }
}

impl Resolve<Arc<dyn SysUserRepository>> for Services {
    fn resolve(&self) -> Result<Arc<dyn SysUserRepository>, ContextError> {
        registered(&self.sys_users)
    }
}

impl Resolve<LoggerFactory> for Services {
    fn resolve(&self) -> Result<LoggerFactory, ContextError> {
        Ok(self.loggers.clone())
    }
}
