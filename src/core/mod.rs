//! 核心类型模块
//!
//! 包含错误类型定义

pub mod error;

pub use error::{BatchError, BatchResult, TransportError};
