//! 集成测试共享工具模块
//!
//! 提供记录请求的模拟连接以及测试辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

use graphbatch::api::Connection;
use graphbatch::core::TransportError;
use graphbatch::graph::{BatchRequest, BatchResponse, OperationResult};
use parking_lot::Mutex;

pub const SITE: &str = "http://localhost:7474/db/data";

type Responder = Box<dyn Fn(&BatchRequest) -> Result<BatchResponse, TransportError> + Send + Sync>;

/// 记录所有请求的模拟连接
///
/// 默认为每个操作返回一个只带 `id` 的结果
pub struct RecordingConnection {
    requests: Mutex<Vec<BatchRequest>>,
    responder: Responder,
    allow_null_values: bool,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::with_responder(|request| {
            Ok(BatchResponse::new(
                request
                    .operations
                    .iter()
                    .map(|op| OperationResult {
                        id: Some(op.id),
                        ..OperationResult::default()
                    })
                    .collect(),
            ))
        })
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&BatchRequest) -> Result<BatchResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            allow_null_values: false,
        }
    }

    /// 返回固定响应
    pub fn with_response(response: BatchResponse) -> Self {
        Self::with_responder(move |_| Ok(response.clone()))
    }

    /// 总是失败的连接
    pub fn failing(error: TransportError) -> Self {
        Self::with_responder(move |_| Err(error.clone()))
    }

    /// 模拟服务端：为每个创建操作分配 `/<resource>/<1000 + id>` 地址
    pub fn assigning() -> Self {
        Self::with_responder(|request| {
            Ok(BatchResponse::new(
                request
                    .operations
                    .iter()
                    .map(|op| {
                        let to = op.to.to_string();
                        let body = if to == "/node" {
                            Some(serde_json::json!({"self": format!("{}/node/{}", SITE, 1000 + op.id)}))
                        } else if to.ends_with("/relationships") {
                            Some(serde_json::json!({"self": format!("{}/relationship/{}", SITE, 1000 + op.id)}))
                        } else {
                            None
                        };
                        OperationResult {
                            id: Some(op.id),
                            body,
                            ..OperationResult::default()
                        }
                    })
                    .collect(),
            ))
        })
    }

    pub fn allowing_null_values(mut self) -> Self {
        self.allow_null_values = true;
        self
    }

    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Connection for RecordingConnection {
    fn site(&self) -> &str {
        SITE
    }

    fn allow_null_values(&self) -> bool {
        self.allow_null_values
    }

    fn execute(&self, request: &BatchRequest) -> Result<BatchResponse, TransportError> {
        self.requests.lock().push(request.clone());
        (self.responder)(request)
    }
}
