use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// 统一的API错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 未找到资源
    NotFound(String),
    /// 请求参数错误
    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// 实现IntoResponse，将错误转换为HTTP响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 辅助宏：快速创建错误
#[macro_export]
macro_rules! api_error {
    (NotFound, $msg:expr) => {
        $crate::api::error::ApiError::NotFound($msg.to_string())
    };
    (BadRequest, $msg:expr) => {
        $crate::api::error::ApiError::BadRequest($msg.to_string())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ApiError::NotFound("狂飙".to_string());
        assert_eq!(error.to_string(), "Not found: 狂飙");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            api_error!(BadRequest, "缺少搜索关键词").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error!(NotFound, "x").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
