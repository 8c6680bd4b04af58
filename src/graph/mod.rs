//! 批量事务核心模块
//!
//! 包含实体定义、操作队列、实例注册表、批量事务以及请求响应结构

pub mod batch_operation;
pub mod entity;
pub mod registry;
pub mod response;
pub mod transaction;

// 重新导出批量事务相关功能
pub use batch_operation::*;
pub use entity::*;
pub use registry::{InstanceRegistry, SealedRegistry};
pub use response::*;
pub use transaction::BatchTransaction;
