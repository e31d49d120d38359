/*
 * Responsibility
 * - sys_users (管理画面の操作者アカウント) の repository 契約
 * - Repository<SysUser> に「全件取得」を足したもの
 * - PostgreSQL (SQLx) 実装
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::{
    base::{Entity, Repository},
    error::RepoError,
};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SysUser {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub account: String,
    #[sqlx(rename = "realName")]
    pub real_name: Option<String>,
    #[sqlx(rename = "organizeId")]
    pub organize_id: Option<String>,
    #[sqlx(rename = "departmentId")]
    pub department_id: Option<String>,
    #[sqlx(rename = "roleId")]
    pub role_id: Option<String>,
    #[sqlx(rename = "isSystem")]
    pub is_system: bool,
    pub enabled: bool,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for SysUser {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
pub trait SysUserRepository: Repository<SysUser> {
    async fn get_sys_users(&self) -> Result<Vec<SysUser>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgSysUserRepository {
    db: PgPool,
}

impl PgSysUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const COLUMNS: &str = r#""userId", account, "realName", "organizeId", "departmentId", "roleId", "isSystem", enabled, "createdAt", "updatedAt""#;

#[async_trait]
impl Repository<SysUser> for PgSysUserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<SysUser>, RepoError> {
        let row = sqlx::query_as::<_, SysUser>(&format!(
            r#"SELECT {COLUMNS} FROM sys_users WHERE "userId" = $1"#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn insert(&self, user: &SysUser) -> Result<SysUser, RepoError> {
        // createdAt / updatedAt は DB 側の default に任せる
        let row = sqlx::query_as::<_, SysUser>(&format!(
            r#"
            INSERT INTO sys_users
                ("userId", account, "realName", "organizeId", "departmentId", "roleId", "isSystem", enabled)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.account)
        .bind(user.real_name.as_deref())
        .bind(user.organize_id.as_deref())
        .bind(user.department_id.as_deref())
        .bind(user.role_id.as_deref())
        .bind(user.is_system)
        .bind(user.enabled)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, user: &SysUser) -> Result<Option<SysUser>, RepoError> {
        let row = sqlx::query_as::<_, SysUser>(&format!(
            r#"
            UPDATE sys_users
            SET
                account = $2,
                "realName" = $3,
                "organizeId" = $4,
                "departmentId" = $5,
                "roleId" = $6,
                "isSystem" = $7,
                enabled = $8,
                "updatedAt" = now()
            WHERE "userId" = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user.id())
        .bind(&user.account)
        .bind(user.real_name.as_deref())
        .bind(user.organize_id.as_deref())
        .bind(user.department_id.as_deref())
        .bind(user.role_id.as_deref())
        .bind(user.is_system)
        .bind(user.enabled)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sys_users
            WHERE "userId" = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, RepoError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sys_users")
            .fetch_one(&self.db)
            .await?;

        Ok(n)
    }
}

#[async_trait]
impl SysUserRepository for PgSysUserRepository {
    async fn get_sys_users(&self) -> Result<Vec<SysUser>, RepoError> {
        let rows = sqlx::query_as::<_, SysUser>(&format!(
            r#"SELECT {COLUMNS} FROM sys_users ORDER BY "createdAt" DESC"#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

/// テスト用の in-memory 実装
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct InMemorySysUserRepository {
        rows: Mutex<Vec<SysUser>>,
    }

    impl InMemorySysUserRepository {
        pub fn with_rows(rows: Vec<SysUser>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }
    }

    pub fn sys_user(account: &str) -> SysUser {
        let now = Utc::now();
        SysUser {
            id: Uuid::new_v4(),
            account: account.to_string(),
            real_name: None,
            organize_id: None,
            department_id: None,
            role_id: None,
            is_system: false,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl Repository<SysUser> for InMemorySysUserRepository {
        async fn find(&self, id: Uuid) -> Result<Option<SysUser>, RepoError> {
            Ok(self.rows.lock().await.iter().find(|u| u.id == id).cloned())
        }

        async fn insert(&self, user: &SysUser) -> Result<SysUser, RepoError> {
            self.rows.lock().await.push(user.clone());
            Ok(user.clone())
        }

        async fn update(&self, user: &SysUser) -> Result<Option<SysUser>, RepoError> {
            let mut rows = self.rows.lock().await;
            Ok(rows.iter_mut().find(|u| u.id == user.id).map(|slot| {
                *slot = user.clone();
                slot.clone()
            }))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
            let mut rows = self.rows.lock().await;
            let before = rows.len();
            rows.retain(|u| u.id != id);
            Ok(rows.len() != before)
        }

        async fn count(&self) -> Result<i64, RepoError> {
            Ok(self.rows.lock().await.len() as i64)
        }
    }

    #[async_trait]
    impl SysUserRepository for InMemorySysUserRepository {
        async fn get_sys_users(&self) -> Result<Vec<SysUser>, RepoError> {
            Ok(self.rows.lock().await.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{InMemorySysUserRepository, sys_user};
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn contract_is_usable_through_a_trait_object() {
        let repo: Arc<dyn SysUserRepository> = Arc::new(InMemorySysUserRepository::default());

        let alice = repo.insert(&sys_user("alice")).await.unwrap();
        repo.insert(&sys_user("bob")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.get_sys_users().await.unwrap().len(), 2);
        assert_eq!(repo.find(alice.id()).await.unwrap(), Some(alice.clone()));

        let renamed = SysUser {
            account: "alice2".into(),
            ..alice.clone()
        };
        assert_eq!(
            repo.update(&renamed).await.unwrap().map(|u| u.account),
            Some("alice2".to_string())
        );

        assert!(repo.delete(alice.id).await.unwrap());
        assert!(!repo.delete(alice.id).await.unwrap());
        assert_eq!(repo.find(alice.id).await.unwrap(), None);
    }
}
