/*
 * Responsibility
 * - /sys-users 系 handler (管理用。ログイン必須)
 * - RequestContext は CoreCtx で明示的に受け取る
 * - 見つからない場合は 404 ではなく failed() を返す
 */
use std::sync::Arc;

use axum::extract::Path;
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::sys_users::SysUserResponse,
        extractors::CoreCtx,
        response::{self, ApiResult},
    },
    context::provider,
    error::AppError,
    repos::{base::Repository, sys_user_repo::SysUserRepository},
};

pub async fn list_sys_users(
    CoreCtx(ctx): CoreCtx,
) -> Result<ApiResult<Vec<SysUserResponse>>, AppError> {
    let operator = ctx.operator()?;
    let repo = provider::get_service::<Arc<dyn SysUserRepository>>()?;
    let logger = ctx.logger(Some("sys_users"))?;

    let rows = repo.get_sys_users().await?;
    logger.debug(&format!(
        "{} sys users listed by {}",
        rows.len(),
        operator.account.as_deref().unwrap_or("-")
    ));

    let res = rows.into_iter().map(SysUserResponse::from).collect();
    Ok(response::success(res, None))
}

pub async fn get_sys_user(
    CoreCtx(ctx): CoreCtx,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResult<SysUserResponse>, AppError> {
    ctx.operator()?;
    let repo: Arc<dyn SysUserRepository> = ctx.service()?;

    match repo.find(user_id).await? {
        Some(row) => Ok(response::success(row.into(), None)),
        None => Ok(response::failed("sys user not found")),
    }
}
