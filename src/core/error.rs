//! 统一错误处理
//!
//! ## 设计理念
//!
//! 1. **构建期错误**（验证、寻址）在调用构建方法时立即返回，不会触发任何网络请求，
//!    事务在出错后仍然可以继续使用
//! 2. **执行期错误**（传输）由 `Connection` 产生，通过 `#[from]` 原样向上传播
//! 3. **统一接口**：`BatchResult<T>` 提供统一的返回类型，简化错误传播

use thiserror::Error;

use crate::graph::EntityKind;

/// 批量事务错误类型
#[derive(Error, Debug)]
pub enum BatchError {
    /// 实体在入队之前未通过验证，队列保持不变
    #[error("验证错误: {kind} 未通过验证: {}", .messages.join("; "))]
    Validation {
        kind: EntityKind,
        messages: Vec<String>,
    },

    /// 实体既没有占位符也没有持久化地址，无法在批量请求中引用
    #[error("寻址错误: {0}")]
    Addressing(String),

    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
}

/// 统一的结果类型
pub type BatchResult<T> = Result<T, BatchError>;

/// 连接层错误类型
///
/// 涵盖批量请求发送与响应解析过程中的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP请求失败: {0}")]
    Http(String),
    #[error("服务端返回错误状态 {status}: {body}")]
    Status { status: u16, body: String },
    #[error("响应解析失败: {0}")]
    Decode(String),
    #[error("连接配置错误: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else if e.is_builder() {
            TransportError::Config(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = BatchError::Validation {
            kind: EntityKind::Relationship,
            messages: vec!["缺少类型".to_string(), "name 不能为空".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("relationship"));
        assert!(msg.contains("缺少类型; name 不能为空"));
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: BatchError = TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            BatchError::Transport(TransportError::Status { status: 500, .. })
        ));
    }
}
