//! 批量操作结构定义
//!
//! 包含批量请求中单个操作、操作目标地址以及只追加的操作队列

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// 占位符 ID，即操作在队列中的位置
pub type PlaceholderId = usize;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// 批量请求内对实体的引用
///
/// 只记录地址形式，不携带实体种类：种类由 `EntityHandle::kind` 给出，
/// 而关系端点按定义总是节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    /// 服务端已分配的地址
    Persisted(String),
    /// 同一批次中尚未执行的操作结果
    Pending(PlaceholderId),
}

impl EntityRef {
    /// 实体本身的地址
    pub fn target(&self) -> Target {
        self.join("")
    }

    /// 在实体地址后追加子路径
    pub fn join(&self, suffix: &str) -> Target {
        match self {
            EntityRef::Persisted(locator) => Target::Absolute(format!("{}{}", locator, suffix)),
            EntityRef::Pending(id) => Target::Placeholder {
                id: *id,
                suffix: suffix.to_string(),
            },
        }
    }
}

/// 操作的目标地址
///
/// 占位符地址序列化为 `{N}` 加可选子路径，例如 `{3}/relationships`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Absolute(String),
    Placeholder { id: PlaceholderId, suffix: String },
}

impl Target {
    pub fn absolute(path: impl Into<String>) -> Self {
        Target::Absolute(path.into())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Absolute(path) => f.write_str(path),
            Target::Placeholder { id, suffix } => write!(f, "{{{}}}{}", id, suffix),
        }
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 批量请求中的单个操作
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub method: Method,
    pub to: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// 操作在队列中的位置，同时作为占位符 ID
    pub id: PlaceholderId,
}

impl Operation {
    pub fn position(&self) -> PlaceholderId {
        self.id
    }
}

/// 只追加的操作队列
///
/// 操作 ID 只能由队列分配，等于追加时的队列长度，操作一旦入队不会被重排或删除
#[derive(Debug, Clone, Default)]
pub struct OperationQueue {
    operations: Vec<Operation>,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个入队操作将获得的 ID
    pub fn next_id(&self) -> PlaceholderId {
        self.operations.len()
    }

    pub fn push(&mut self, method: Method, to: Target, body: Option<Value>) -> PlaceholderId {
        let id = self.next_id();
        self.operations.push(Operation {
            method,
            to,
            body,
            id,
        });
        id
    }

    pub fn get(&self, id: PlaceholderId) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }
}
