//! Bearer token (HS256 JWT) の検証 → ClaimsIdentity への展開
//!
//! トークンの発行はこのサービスの責務外。ここでは署名と iss/aud/exp だけを見る。
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::{Claim, ClaimsIdentity};

pub const AUTHENTICATION_TYPE: &str = "Bearer";

#[derive(Debug, Error)]
pub enum ClaimsTokenError {
    #[error("jwt secret must not be empty")]
    EmptySecret,
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct ClaimsVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for ClaimsVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("ClaimsVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl ClaimsVerifier {
    pub fn new(
        secret: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, ClaimsTokenError> {
        if secret.trim().is_empty() {
            return Err(ClaimsTokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<ClaimsIdentity, ClaimsTokenError> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;
        Ok(flatten_claims(data.claims))
    }
}

/// payload の各メンバーを Claim に展開する
///
/// - 文字列 → 1件
/// - 配列 → 要素ごとに1件 (配列内の順序を保つ)
/// - 数値 / bool → 文字列表現で1件
/// - null / object は無視
///
/// メンバーはトークン内の記述順に並ぶ (serde_json の `preserve_order`)。
/// 種別の判定は大文字小文字を区別しないので、`sid` と `SID` が両方あれば先に書かれた方が first-match になる
pub fn flatten_claims(payload: Map<String, Value>) -> ClaimsIdentity {
    let mut identity = ClaimsIdentity::new(AUTHENTICATION_TYPE);

    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        identity.push(Claim::new(key.as_str(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    identity.push(Claim::new(key.as_str(), text));
                }
            }
        }
    }

    identity
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClaimType, Operator};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn verifier() -> ClaimsVerifier {
        ClaimsVerifier::new(SECRET, "skymall-test", "skymall-api", 0).unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 600
    }

    #[test]
    fn valid_token_becomes_identity() {
        let token = testing::sign(
            SECRET,
            &json!({
                "iss": "skymall-test",
                "aud": "skymall-api",
                "exp": exp(),
                "sid": "42",
                "name": "alice",
                "role": ["admin", "auditor"],
                "ispersistent": true,
            }),
        );

        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.authentication_type.as_deref(), Some("Bearer"));

        let operator = Operator::from_identity(Some(&identity)).unwrap();
        assert_eq!(operator.user_id.as_deref(), Some("42"));
        assert_eq!(operator.account.as_deref(), Some("alice"));
        assert_eq!(operator.role_id.as_deref(), Some("admin"));
        assert!(operator.is_system);
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let token = testing::sign(
            SECRET,
            &json!({ "iss": "skymall-test", "aud": "other", "exp": exp(), "sid": "1" }),
        );
        assert!(matches!(
            verifier().verify(&token),
            Err(ClaimsTokenError::Jwt(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = testing::sign(
            "another-secret",
            &json!({ "iss": "skymall-test", "aud": "skymall-api", "exp": exp() }),
        );
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = testing::sign(
            SECRET,
            &json!({ "iss": "skymall-test", "aud": "skymall-api", "exp": 1_000 }),
        );
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            ClaimsVerifier::new(" ", "iss", "aud", 0),
            Err(ClaimsTokenError::EmptySecret)
        ));
    }

    #[test]
    fn flatten_keeps_array_order_and_skips_nested_values() {
        let payload = json!({
            "role": ["r1", "r2"],
            "dns": "10.0.0.1",
            "nested": { "a": 1 },
            "none": null,
            "iat": 1700000000,
        });
        let Value::Object(map) = payload else {
            unreachable!()
        };

        let identity = flatten_claims(map);
        let roles: Vec<&str> = identity
            .claims()
            .iter()
            .filter(|c| c.kind == ClaimType::Role)
            .map(|c| c.value.as_str())
            .collect();

        assert_eq!(roles, vec!["r1", "r2"]);
        assert_eq!(identity.find_first(&ClaimType::Dns), Some("10.0.0.1"));
        assert_eq!(
            identity.find_first(&ClaimType::Other("iat".into())),
            Some("1700000000")
        );
        assert!(
            identity
                .claims()
                .iter()
                .all(|c| c.kind.as_str() != "nested" && c.kind.as_str() != "none")
        );
    }

    #[test]
    fn duplicate_kinds_keep_token_order() {
        let map: Map<String, Value> =
            serde_json::from_str(r#"{"sid":"first","SID":"second","Role":"r1","role":"r2"}"#)
                .unwrap();

        let operator = Operator::from_identity(Some(&flatten_claims(map))).unwrap();
        assert_eq!(operator.user_id.as_deref(), Some("first"));
        assert_eq!(operator.role_id.as_deref(), Some("r1"));
    }

    #[test]
    fn verified_token_keeps_payload_order() {
        let token = testing::sign(
            SECRET,
            &json!({
                "iss": "skymall-test",
                "aud": "skymall-api",
                "exp": exp(),
                "sid": "first",
                "SID": "second",
            }),
        );

        let identity = verifier().verify(&token).unwrap();
        let operator = Operator::from_identity(Some(&identity)).unwrap();
        assert_eq!(operator.user_id.as_deref(), Some("first"));
    }
}
