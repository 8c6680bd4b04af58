//! 属性容器（节点与关系）定义
//!
//! 节点和关系都携带一组键值属性，并在服务端分配身份后记住自己的地址（`self`）。
//! 批量事务通过 `EntityHandle` 这一标记联合体对两种实体进行分派。

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value;

/// 属性映射
pub type PropertyMap = serde_json::Map<String, Value>;

/// 属性验证规则，返回 `Err(消息)` 表示验证失败
pub type Rule = Arc<dyn Fn(&PropertyMap) -> Result<(), String> + Send + Sync>;

static NEXT_ENTITY_KEY: AtomicU64 = AtomicU64::new(1);

/// 内存实体的进程内唯一标识
///
/// 与服务端分配的身份无关，只用于在事务内部识别同一个实体对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(u64);

impl EntityKey {
    fn next() -> Self {
        Self(NEXT_ENTITY_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

/// 实体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Node,
    Relationship,
}

impl EntityKind {
    /// REST 资源名，用于构造集合地址
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Relationship => "relationship",
        }
    }

    /// 该种类实体的默认索引名
    pub fn default_index(&self) -> &'static str {
        match self {
            EntityKind::Node => "node_auto_index",
            EntityKind::Relationship => "relationship_auto_index",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// 属性容器的公共能力
pub trait PropertyContainer {
    fn kind(&self) -> EntityKind;

    fn attributes(&self) -> &PropertyMap;

    /// 服务端分配的资源地址
    fn locator(&self) -> Option<&str>;

    fn assign_locator(&mut self, locator: String);

    fn rules(&self) -> &[Rule];

    /// 实体自定义的索引名，未设置时使用种类默认值
    fn index_name(&self) -> &str {
        self.kind().default_index()
    }

    fn resource(&self) -> &'static str {
        self.kind().resource()
    }

    fn is_new(&self) -> bool {
        self.locator().is_none()
    }

    /// 数字身份，即地址的最后一段
    fn id(&self) -> Option<&str> {
        self.locator()
            .and_then(|locator| locator.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
    }

    /// 需要发送给服务端的属性
    ///
    /// 值为 `null` 的属性只有在允许空值时才会发送
    fn sendable_attributes(&self, allow_null: bool) -> PropertyMap {
        self.attributes()
            .iter()
            .filter(|(_, value)| allow_null || !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let attributes = self.attributes();
        let messages: Vec<String> = self
            .rules()
            .iter()
            .filter_map(|rule| rule(attributes).err())
            .collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(messages)
        }
    }
}

/// 图节点
#[derive(Default)]
pub struct Node {
    attributes: PropertyMap,
    locator: Option<String>,
    index: Option<String>,
    rules: Vec<Rule>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(attributes: PropertyMap) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// 已持久化的节点
    pub fn persisted(locator: impl Into<String>, attributes: PropertyMap) -> Self {
        Self {
            attributes,
            locator: Some(locator.into()),
            ..Self::default()
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&PropertyMap) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }
}

impl PropertyContainer for Node {
    fn kind(&self) -> EntityKind {
        EntityKind::Node
    }

    fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    fn assign_locator(&mut self, locator: String) {
        self.locator = Some(locator);
    }

    fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn index_name(&self) -> &str {
        self.index
            .as_deref()
            .unwrap_or_else(|| EntityKind::Node.default_index())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("attributes", &self.attributes)
            .field("locator", &self.locator)
            .field("index", &self.index)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// 图关系，连接起始节点与结束节点
pub struct Relationship {
    rel_type: String,
    start: NodeRef,
    end: NodeRef,
    attributes: PropertyMap,
    locator: Option<String>,
    index: Option<String>,
    rules: Vec<Rule>,
}

impl Relationship {
    pub fn new(rel_type: impl Into<String>, start: NodeRef, end: NodeRef) -> Self {
        Self {
            rel_type: rel_type.into(),
            start,
            end,
            attributes: PropertyMap::new(),
            locator: None,
            index: None,
            rules: Vec::new(),
        }
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    pub fn start(&self) -> &NodeRef {
        &self.start
    }

    pub fn end(&self) -> &NodeRef {
        &self.end
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: PropertyMap) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&PropertyMap) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push(Arc::new(rule));
        self
    }
}

impl PropertyContainer for Relationship {
    fn kind(&self) -> EntityKind {
        EntityKind::Relationship
    }

    fn attributes(&self) -> &PropertyMap {
        &self.attributes
    }

    fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    fn assign_locator(&mut self, locator: String) {
        self.locator = Some(locator);
    }

    fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn index_name(&self) -> &str {
        self.index
            .as_deref()
            .unwrap_or_else(|| EntityKind::Relationship.default_index())
    }

    fn validate(&self) -> Result<(), Vec<String>> {
        let mut messages = Vec::new();
        if self.rel_type.trim().is_empty() {
            messages.push("关系类型不能为空".to_string());
        }
        let attributes = &self.attributes;
        messages.extend(self.rules.iter().filter_map(|rule| rule(attributes).err()));
        if messages.is_empty() {
            Ok(())
        } else {
            Err(messages)
        }
    }
}

impl fmt::Debug for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("rel_type", &self.rel_type)
            .field("start", &self.start.key())
            .field("end", &self.end.key())
            .field("attributes", &self.attributes)
            .field("locator", &self.locator)
            .field("index", &self.index)
            .finish()
    }
}

/// 共享实体句柄
///
/// 调用方与批量事务共同持有同一个实体，协调阶段写回的地址对调用方立即可见
pub struct Shared<T> {
    key: EntityKey,
    inner: Arc<RwLock<T>>,
}

pub type NodeRef = Shared<Node>;
pub type RelationshipRef = Shared<Relationship>;

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            key: EntityKey::next(),
            inner: Arc::new(RwLock::new(value)),
        }
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("key", &self.key)
            .field("inner", &*self.inner.read())
            .finish()
    }
}

impl From<Node> for NodeRef {
    fn from(node: Node) -> Self {
        Shared::new(node)
    }
}

impl From<Relationship> for RelationshipRef {
    fn from(relationship: Relationship) -> Self {
        Shared::new(relationship)
    }
}

/// 批量事务处理的实体，按种类分派
#[derive(Debug, Clone)]
pub enum EntityHandle {
    Node(NodeRef),
    Relationship(RelationshipRef),
}

impl EntityHandle {
    pub fn key(&self) -> EntityKey {
        match self {
            EntityHandle::Node(node) => node.key(),
            EntityHandle::Relationship(rel) => rel.key(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityHandle::Node(_) => EntityKind::Node,
            EntityHandle::Relationship(_) => EntityKind::Relationship,
        }
    }

    pub fn locator(&self) -> Option<String> {
        self.with(|c| c.locator().map(str::to_string))
    }

    pub fn id(&self) -> Option<String> {
        self.with(|c| c.id().map(str::to_string))
    }

    pub fn is_new(&self) -> bool {
        self.with(|c| c.is_new())
    }

    pub fn index_name(&self) -> String {
        self.with(|c| c.index_name().to_string())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        self.with(|c| c.validate())
    }

    pub fn sendable_attributes(&self, allow_null: bool) -> PropertyMap {
        self.with(|c| c.sendable_attributes(allow_null))
    }

    /// 写入服务端分配的身份，仅在协调阶段调用
    pub fn assign_identity(&self, locator: String) {
        match self {
            EntityHandle::Node(node) => node.write().assign_locator(locator),
            EntityHandle::Relationship(rel) => rel.write().assign_locator(locator),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&dyn PropertyContainer) -> R) -> R {
        match self {
            EntityHandle::Node(node) => f(&*node.read()),
            EntityHandle::Relationship(rel) => f(&*rel.read()),
        }
    }
}

impl From<NodeRef> for EntityHandle {
    fn from(node: NodeRef) -> Self {
        EntityHandle::Node(node)
    }
}

impl From<&NodeRef> for EntityHandle {
    fn from(node: &NodeRef) -> Self {
        EntityHandle::Node(node.clone())
    }
}

impl From<RelationshipRef> for EntityHandle {
    fn from(rel: RelationshipRef) -> Self {
        EntityHandle::Relationship(rel)
    }
}

impl From<&RelationshipRef> for EntityHandle {
    fn from(rel: &RelationshipRef) -> Self {
        EntityHandle::Relationship(rel.clone())
    }
}
