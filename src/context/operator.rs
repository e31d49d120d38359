/*
 * Responsibility
 * - 認証済み identity に載った Claim の型 (ClaimType / Claim / ClaimsIdentity)
 * - Claims → Operator (「誰がこのリクエストを投げたか」) への変換
 *
 * Notes
 * - 各フィールドは同種 Claim の「最初の1件」を採用する (first-match)
 * - Operator はアクセスのたびに組み立てる。キャッシュしない
 */
use serde::Serialize;

use super::ContextError;

/// Operator の組み立てに使う Claim の種別
///
/// wire 上の名前 (JWT の payload key) は `as_str()` を参照。未知の種別は `Other` に入る。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimType {
    Sid,
    Name,
    GivenName,
    PrimarySid,
    PrimaryGroupSid,
    Role,
    Dns,
    IsPersistent,
    Other(String),
}

impl ClaimType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sid => "sid",
            Self::Name => "name",
            Self::GivenName => "given_name",
            Self::PrimarySid => "primarysid",
            Self::PrimaryGroupSid => "primarygroupsid",
            Self::Role => "role",
            Self::Dns => "dns",
            Self::IsPersistent => "ispersistent",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for ClaimType {
    fn from(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "sid" => Self::Sid,
            "name" => Self::Name,
            "given_name" => Self::GivenName,
            "primarysid" => Self::PrimarySid,
            "primarygroupsid" => Self::PrimaryGroupSid,
            "role" => Self::Role,
            "dns" => Self::Dns,
            "ispersistent" => Self::IsPersistent,
            _ => Self::Other(kind.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub kind: ClaimType,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<ClaimType>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// 上流の認証 middleware が request extensions に載せる identity
///
/// claims は付与された順序のまま保持する (first-match の前提)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsIdentity {
    pub authentication_type: Option<String>,
    claims: Vec<Claim>,
}

impl ClaimsIdentity {
    pub fn new(authentication_type: impl Into<String>) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims: Vec::new(),
        }
    }

    pub fn with_claim(mut self, kind: impl Into<ClaimType>, value: impl Into<String>) -> Self {
        self.push(Claim::new(kind, value));
        self
    }

    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// `kind` に一致する最初の Claim の値
    pub fn find_first(&self, kind: &ClaimType) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| &c.kind == kind)
            .map(|c| c.value.as_str())
    }
}

/// 現在の操作者 (ログインユーザー)
///
/// `is_system` 以外は Option。None は該当 Claim が付いていなかったことを意味する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub user_id: Option<String>,
    pub account: Option<String>,
    pub real_name: Option<String>,
    pub organize_id: Option<String>,
    pub department_id: Option<String>,
    pub role_id: Option<String>,
    pub login_ip_address: Option<String>,
    pub is_system: bool,
}

type ApplyClaim = fn(&mut Operator, &str);

// ClaimType → Operator のフィールド対応表
static OPERATOR_CLAIMS: [(ClaimType, ApplyClaim); 8] = [
    (ClaimType::Sid, |op, v| op.user_id = Some(v.to_string())),
    (ClaimType::Name, |op, v| op.account = Some(v.to_string())),
    (ClaimType::GivenName, |op, v| op.real_name = Some(v.to_string())),
    (ClaimType::PrimarySid, |op, v| op.organize_id = Some(v.to_string())),
    (ClaimType::PrimaryGroupSid, |op, v| {
        op.department_id = Some(v.to_string())
    }),
    (ClaimType::Role, |op, v| op.role_id = Some(v.to_string())),
    (ClaimType::Dns, |op, v| op.login_ip_address = Some(v.to_string())),
    (ClaimType::IsPersistent, |op, v| op.is_system = parse_flag(v)),
];

impl Operator {
    /// identity が無い (未ログイン) 場合は部分的な Operator を返さず `Unauthenticated`
    pub fn from_identity(identity: Option<&ClaimsIdentity>) -> Result<Self, ContextError> {
        let identity = identity.ok_or(ContextError::Unauthenticated)?;

        let mut operator = Operator::default();
        for (kind, apply) in OPERATOR_CLAIMS.iter() {
            if let Some(value) = identity.find_first(kind) {
                apply(&mut operator, value);
            }
        }

        Ok(operator)
    }
}

/// フラグ系 Claim の文字列 → bool
///
/// 前後空白を除き、大文字小文字を無視して `true` / `1` / `yes` / `on` のみ true。
/// それ以外 (`false`, `0`, 空文字、解釈できない値) はすべて false。
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
