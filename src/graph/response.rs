//! 批量请求与响应结构定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::batch_operation::{Method, Operation, PlaceholderId};

/// 发往批量端点的请求
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub method: Method,
    pub uri: String,
    pub operations: Vec<Operation>,
}

impl BatchRequest {
    /// 以 `<site>/batch` 为地址构造 POST 请求
    pub fn new(site: &str, operations: Vec<Operation>) -> Self {
        Self {
            method: Method::Post,
            uri: format!("{}/batch", site.trim_end_matches('/')),
            operations,
        }
    }
}

/// 单个操作的执行结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlaceholderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl OperationResult {
    /// 响应体中新分配的资源地址
    pub fn self_locator(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("self"))
            .and_then(Value::as_str)
    }
}

/// 批量端点的响应，按操作顺序排列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResponse {
    pub results: Vec<OperationResult>,
}

impl BatchResponse {
    pub fn new(results: Vec<OperationResult>) -> Self {
        Self { results }
    }

    pub fn result_for(&self, id: PlaceholderId) -> Option<&OperationResult> {
        self.results.iter().find(|result| result.id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uri() {
        let request = BatchRequest::new("http://localhost:7474/db/data/", Vec::new());
        assert_eq!(request.uri, "http://localhost:7474/db/data/batch");
        assert_eq!(request.method, Method::Post);
    }

    #[test]
    fn test_parse_server_response() {
        let raw = json!([
            {"id": 0, "location": "http://h/db/data/node/42", "body": {"self": "http://h/db/data/node/42", "data": {}}, "from": "/node"},
            {"id": 1, "from": "/index/node/people", "body": null},
            {"status": 204}
        ]);
        let response: BatchResponse = serde_json::from_value(raw).expect("解析响应失败");

        assert_eq!(response.len(), 3);
        assert_eq!(response.results[0].self_locator(), Some("http://h/db/data/node/42"));
        assert_eq!(response.results[1].self_locator(), None);
        assert_eq!(response.results[2].id, None);
        assert_eq!(response.result_for(1).and_then(|r| r.from.as_deref()), Some("/index/node/people"));
    }
}
