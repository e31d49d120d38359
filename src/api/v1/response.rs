/*
 * Responsibility
 * - handler が返す共通の成功/失敗レスポンス (ApiResult<T>)
 * - `{ "success": bool, "message": string|null, "data": T|null }`
 *
 * Notes
 * - message の検証はしない (空でも None でも良い)
 * - 業務上の失敗は failed() で 200 のまま返す。認証/配線エラーは AppError 側
 */
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn new(data: Option<T>, success: bool, message: Option<String>) -> Self {
        Self {
            success,
            message,
            data,
        }
    }
}

pub fn success<T>(data: T, message: Option<String>) -> ApiResult<T> {
    ApiResult::new(Some(data), true, message)
}

pub fn failed<T>(message: impl Into<String>) -> ApiResult<T> {
    ApiResult::new(None, false, Some(message.into()))
}

impl<T: Serialize> IntoResponse for ApiResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn success_preserves_data_and_message() {
        let res = success(vec![1, 2, 3], Some("loaded".to_string()));
        assert!(res.success);
        assert_eq!(res.data, Some(vec![1, 2, 3]));
        assert_eq!(res.message.as_deref(), Some("loaded"));

        let bare = success("x", None);
        assert!(bare.success);
        assert_eq!(bare.message, None);
    }

    #[test]
    fn failed_has_no_payload() {
        let res: ApiResult<Vec<u8>> = failed("nope");
        assert!(!res.success);
        assert_eq!(res.data, None);
        assert_eq!(res.message.as_deref(), Some("nope"));

        let empty: ApiResult<u8> = failed("");
        assert_eq!(empty.message.as_deref(), Some(""));
    }

    #[test]
    fn serialized_shape() {
        let ok = serde_json::to_value(success(json!({"id": 1}), None)).unwrap();
        assert_eq!(
            ok,
            json!({"success": true, "message": null, "data": {"id": 1}})
        );

        let ng = serde_json::to_value(failed::<u8>("bad")).unwrap();
        assert_eq!(ng, json!({"success": false, "message": "bad", "data": null}));
    }

    #[tokio::test]
    async fn renders_as_json_200() {
        let res = failed::<u8>("bad").into_response();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], json!(false));
    }
}
