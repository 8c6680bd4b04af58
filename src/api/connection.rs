//! 连接抽象
//!
//! 批量事务只通过这个 trait 使用传输层：获取服务根地址、发送一次批量请求

use crate::core::TransportError;
use crate::graph::{BatchRequest, BatchResponse};

pub trait Connection {
    /// 服务根地址，例如 `http://localhost:7474/db/data`
    fn site(&self) -> &str;

    /// 是否发送值为 null 的属性
    fn allow_null_values(&self) -> bool {
        false
    }

    /// 同步发送请求并解析响应，传输失败原样返回
    fn execute(&self, request: &BatchRequest) -> Result<BatchResponse, TransportError>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn site(&self) -> &str {
        (**self).site()
    }

    fn allow_null_values(&self) -> bool {
        (**self).allow_null_values()
    }

    fn execute(&self, request: &BatchRequest) -> Result<BatchResponse, TransportError> {
        (**self).execute(request)
    }
}
