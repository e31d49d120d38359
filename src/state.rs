/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - config: 起動時に読んだ設定
 *   - services: リクエストごとの RequestContext に引き渡す service 群
 *   - claims: Bearer トークンの検証器
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::{config::Config, context::Services, services::auth::ClaimsVerifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub services: Services,
    pub claims: Arc<ClaimsVerifier>,
}

impl AppState {
    pub fn new(config: Arc<Config>, services: Services, claims: Arc<ClaimsVerifier>) -> Self {
        Self {
            config,
            services,
            claims,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// MemoryCache + 空の in-memory repository で組み立てる
    pub(crate) fn for_tests() -> Self {
        use crate::repos::sys_user_repo::testing::InMemorySysUserRepository;
        use crate::services::cache::MemoryCache;

        Self::with_services(
            Services::builder()
                .cache(Arc::new(MemoryCache::new()))
                .sys_users(Arc::new(InMemorySysUserRepository::default()))
                .build(),
        )
    }

    pub(crate) fn with_services(services: Services) -> Self {
        let config = Arc::new(crate::config::test_config());
        let claims = crate::services::auth::build_claims_verifier(&config)
            .expect("test claims verifier");

        Self::new(config, services, claims)
    }
}
