//! 测试数据生成模块
//!
//! 提供节点、关系与属性的生成函数

use graphbatch::graph::{Node, NodeRef, PropertyMap, Relationship, RelationshipRef};
use serde_json::{json, Value};

use super::SITE;

/// 由键值对构造属性映射
pub fn props(pairs: &[(&str, Value)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// 创建新的人员节点
pub fn new_person(name: &str) -> NodeRef {
    NodeRef::new(Node::with_attributes(props(&[("name", json!(name))])))
}

/// 创建已持久化的人员节点
pub fn persisted_person(id: u64, name: &str) -> NodeRef {
    NodeRef::new(Node::persisted(
        format!("{}/node/{}", SITE, id),
        props(&[("name", json!(name))]),
    ))
}

/// 创建关系
pub fn knows(start: &NodeRef, end: &NodeRef) -> RelationshipRef {
    RelationshipRef::new(Relationship::new("KNOWS", start.clone(), end.clone()))
}

/// 节点的绝对地址
pub fn node_address(id: u64) -> String {
    format!("{}/node/{}", SITE, id)
}
