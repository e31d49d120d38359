/*
 * Responsibility
 * - エンティティ共通の CRUD 契約 (Repository<T>)
 * - 個別の repository はこれを supertrait にして操作を足す
 *
 * Notes
 * - 並び順・ページング・絞り込みは契約に含めない (実装側の責務)
 * - dyn で扱えるように async_trait を使う
 */
use async_trait::async_trait;

use crate::repos::error::RepoError;

pub trait Entity: Send + Sync + 'static {
    type Id: Copy + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find(&self, id: T::Id) -> Result<Option<T>, RepoError>;

    async fn insert(&self, entity: &T) -> Result<T, RepoError>;

    // 対象が無ければ Ok(None)
    async fn update(&self, entity: &T) -> Result<Option<T>, RepoError>;

    // 削除できたら true
    async fn delete(&self, id: T::Id) -> Result<bool, RepoError>;

    async fn count(&self) -> Result<i64, RepoError>;
}
