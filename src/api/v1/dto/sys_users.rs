/*
 * Responsibility
 * - SysUsers の response DTO
 * - 行 (SysUser) からの変換
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::sys_user_repo::SysUser;

#[derive(Debug, Serialize)]
pub struct SysUserResponse {
    pub id: Uuid,
    pub account: String,
    pub real_name: Option<String>,
    pub organize_id: Option<String>,
    pub department_id: Option<String>,
    pub role_id: Option<String>,
    pub is_system: bool,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SysUser> for SysUserResponse {
    fn from(u: SysUser) -> Self {
        Self {
            id: u.id,
            account: u.account,
            real_name: u.real_name,
            organize_id: u.organize_id,
            department_id: u.department_id,
            role_id: u.role_id,
            is_system: u.is_system,
            enabled: u.enabled,
            created_at: u.created_at,
        }
    }
}
