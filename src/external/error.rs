// 上游源请求错误
//
// 这些错误只在源客户端内部流转，最终都被转换为“空结果”

use thiserror::Error;

/// 单次上游请求的失败原因
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("请求超时")]
    Timeout,

    #[error("HTTP 错误: 状态码 {0}")]
    Status(u16),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("响应格式错误: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_status() {
            match err.status() {
                Some(status) => SourceError::Status(status.as_u16()),
                None => SourceError::Network(err.to_string()),
            }
        } else if err.is_decode() {
            SourceError::MalformedPayload(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::MalformedPayload(err.to_string())
    }
}
