//! 批量事务
//!
//! 将节点、关系的保存与索引操作累积为有序的操作列表，在 `execute` 时以一次
//! POST 发送到 `<site>/batch`，并把服务端分配的地址写回对应的内存实体。
//!
//! 同一批次内尚未持久化的实体通过占位符 `{N}` 互相引用，`N` 是产生该实体的
//! 操作在队列中的位置。

use std::ops::Range;

use log::{debug, info, warn};
use serde_json::{json, Value};

use super::batch_operation::{EntityRef, Method, Operation, OperationQueue, PlaceholderId, Target};
use super::entity::{EntityHandle, EntityKind, NodeRef, PropertyContainer, PropertyMap, RelationshipRef};
use super::registry::InstanceRegistry;
use super::response::{BatchRequest, BatchResponse};
use crate::api::Connection;
use crate::core::{BatchError, BatchResult};
use crate::utils::{absolute_address, encode_segment};

/// 批量事务
///
/// 事务只能执行一次：`execute` 会消耗事务本身
///
/// # 示例
///
/// ```rust,no_run
/// use graphbatch::api::GraphService;
/// use graphbatch::config::ServiceConfig;
/// use graphbatch::graph::{Node, NodeRef, PropertyContainer, Relationship, RelationshipRef};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = GraphService::new(&ServiceConfig::default())?;
/// let mut tx = service.create_batch_transaction();
///
/// let alice = NodeRef::new(Node::new());
/// alice.write().set("name", "Alice");
/// let bob = NodeRef::new(Node::new());
/// bob.write().set("name", "Bob");
/// let knows = RelationshipRef::new(Relationship::new("KNOWS", alice.clone(), bob.clone()));
///
/// tx.add_save_operation(&alice, true)?;
/// tx.add_save_operation(&bob, true)?;
/// tx.add_save_operation(&knows, true)?;
/// tx.execute()?;
///
/// assert!(alice.read().id().is_some());
/// # Ok(())
/// # }
/// ```
pub struct BatchTransaction<C: Connection> {
    connection: C,
    queue: OperationQueue,
    registry: InstanceRegistry,
}

impl<C: Connection> BatchTransaction<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            queue: OperationQueue::new(),
            registry: InstanceRegistry::new(),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn operations(&self) -> &[Operation] {
        self.queue.operations()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 实体在本批次中的占位符
    pub fn placeholder_of(&self, entity: impl Into<EntityHandle>) -> Option<PlaceholderId> {
        self.registry.placeholder_of(entity.into().key())
    }

    /// 占位符对应的已登记实体
    pub fn instance(&self, id: PlaceholderId) -> Option<&EntityHandle> {
        self.registry.get(id)
    }

    /// 添加保存操作
    ///
    /// 新实体生成创建操作，已持久化的实体生成属性替换操作。验证失败时不会
    /// 入队任何操作，也不会分配占位符。
    ///
    /// # 返回
    /// - 成功时返回分配给该操作的占位符
    pub fn add_save_operation(
        &mut self,
        entity: impl Into<EntityHandle>,
        validate: bool,
    ) -> BatchResult<PlaceholderId> {
        let entity = entity.into();

        if validate {
            entity.validate().map_err(|messages| BatchError::Validation {
                kind: entity.kind(),
                messages,
            })?;
        }

        if !entity.is_new() {
            return self.add_update_operation(entity);
        }

        let allow_null = self.connection.allow_null_values();
        let (to, body) = match &entity {
            EntityHandle::Node(node) => {
                let attributes = node.read().sendable_attributes(allow_null);
                (
                    Target::absolute(format!("/{}", EntityKind::Node.resource())),
                    Value::Object(attributes),
                )
            }
            EntityHandle::Relationship(rel) => self.relationship_create(rel, allow_null)?,
        };

        let id = self.queue.push(Method::Post, to, Some(body));
        debug!("操作 {}: 创建 {}", id, entity.kind());
        self.registry.register(id, entity);
        Ok(id)
    }

    /// 已持久化实体的属性替换操作
    fn add_update_operation(&mut self, entity: EntityHandle) -> BatchResult<PlaceholderId> {
        let identity = entity.id().ok_or_else(|| {
            BatchError::Addressing(format!("{} 的地址中没有可用的身份", entity.kind()))
        })?;
        let body = entity.sendable_attributes(self.connection.allow_null_values());
        let to = format!("/{}/{}/properties", entity.kind().resource(), identity);

        let id = self
            .queue
            .push(Method::Put, Target::Absolute(to), Some(Value::Object(body)));
        debug!("操作 {}: 更新 {} {}", id, entity.kind(), identity);
        self.registry.register(id, entity);
        Ok(id)
    }

    /// 新关系的创建地址与请求体
    fn relationship_create(
        &self,
        rel: &RelationshipRef,
        allow_null: bool,
    ) -> BatchResult<(Target, Value)> {
        let rel = rel.read();
        let start = self.resolve_endpoint(rel.start(), "起始")?;
        let end = self.resolve_endpoint(rel.end(), "结束")?;

        let mut body = json!({
            "to": end.target().to_string(),
            "type": rel.rel_type(),
        });
        let data = rel.sendable_attributes(allow_null);
        if !data.is_empty() {
            body["data"] = Value::Object(data);
        }

        Ok((start.join("/relationships"), body))
    }

    /// 决定关系端点的地址
    ///
    /// 本批次中有占位符的节点使用 `{N}`，否则使用已持久化的绝对地址；两者都
    /// 没有时无法寻址
    fn resolve_endpoint(&self, node: &NodeRef, role: &str) -> BatchResult<EntityRef> {
        if let Some(id) = self.registry.placeholder_of(node.key()) {
            return Ok(EntityRef::Pending(id));
        }
        match node.read().locator() {
            Some(locator) => Ok(EntityRef::Persisted(absolute_address(
                self.connection.site(),
                locator,
            ))),
            None => Err(BatchError::Addressing(format!(
                "关系的{}节点既未保存也未加入当前批次",
                role
            ))),
        }
    }

    /// 添加索引条目
    ///
    /// 每个属性生成一个 POST。`update` 为 true 时先为每个键生成一个 DELETE，
    /// 所有 DELETE 都排在 POST 之前。`index` 为空时使用实体的默认索引。
    ///
    /// # 返回
    /// - 本次入队操作的位置范围
    pub fn add_to_index_operation(
        &mut self,
        entity: impl Into<EntityHandle>,
        attributes: &PropertyMap,
        index: Option<&str>,
        update: bool,
    ) -> BatchResult<Range<PlaceholderId>> {
        let entity = entity.into();
        let (uri, identity) = self.index_identity(&entity)?;
        let collection = index_collection(&entity, index);
        let first = self.queue.next_id();

        if update {
            for key in attributes.keys() {
                let to = format!("{}/{}/{}", collection, encode_segment(key), identity);
                self.queue.push(Method::Delete, Target::Absolute(to), None);
            }
        }

        for (key, value) in attributes {
            let body = json!({"uri": uri, "key": key, "value": value});
            self.queue
                .push(Method::Post, Target::Absolute(collection.clone()), Some(body));
        }

        let range = first..self.queue.next_id();
        debug!("操作 {:?}: 索引 {} {}", range, collection, identity);
        Ok(range)
    }

    /// 从索引中移除实体
    ///
    /// 给出属性时为每个键生成一个 DELETE，否则生成一个移除该实体全部条目的 DELETE
    pub fn add_remove_from_index_operation(
        &mut self,
        entity: impl Into<EntityHandle>,
        index: Option<&str>,
        attributes: Option<&PropertyMap>,
    ) -> BatchResult<Range<PlaceholderId>> {
        let entity = entity.into();
        let (_, identity) = self.index_identity(&entity)?;
        let collection = index_collection(&entity, index);
        let first = self.queue.next_id();

        match attributes.filter(|attrs| !attrs.is_empty()) {
            Some(attrs) => {
                for key in attrs.keys() {
                    let to = format!("{}/{}/{}", collection, encode_segment(key), identity);
                    self.queue.push(Method::Delete, Target::Absolute(to), None);
                }
            }
            None => {
                let to = format!("{}/{}", collection, identity);
                self.queue.push(Method::Delete, Target::Absolute(to), None);
            }
        }

        let range = first..self.queue.next_id();
        debug!("操作 {:?}: 移除索引 {} {}", range, collection, identity);
        Ok(range)
    }

    /// 索引条目总是引用实体的规范地址，不能使用占位符
    fn index_identity(&self, entity: &EntityHandle) -> BatchResult<(String, String)> {
        let missing = || {
            BatchError::Addressing(format!("{} 尚未持久化，无法加入索引", entity.kind()))
        };
        let locator = entity.locator().ok_or_else(missing)?;
        let identity = entity.id().ok_or_else(missing)?;
        Ok((absolute_address(self.connection.site(), &locator), identity))
    }

    /// 执行批量请求
    ///
    /// 队列为空时不发送任何请求并返回 `None`。发送之前会先清除所有占位符，
    /// 因此无论请求成功与否，实体都不会再持有本批次的占位符。
    pub fn execute(self) -> BatchResult<Option<BatchResponse>> {
        let Self {
            connection,
            queue,
            registry,
        } = self;

        if queue.is_empty() {
            debug!("批量事务为空，跳过请求");
            return Ok(None);
        }

        let instances = registry.seal();
        let request = BatchRequest::new(connection.site(), queue.into_operations());
        info!(
            "发送批量请求: {} 个操作, {} 个实体",
            request.operations.len(),
            instances.len()
        );

        let response = connection.execute(&request).map_err(|e| {
            warn!("批量请求失败: {}", e);
            BatchError::from(e)
        })?;

        let assigned = instances.reconcile(&response);
        info!(
            "批量请求完成: {} 个结果, {} 个实体获得身份",
            response.len(),
            assigned
        );
        Ok(Some(response))
    }
}

fn index_collection(entity: &EntityHandle, index: Option<&str>) -> String {
    let name = match index {
        Some(name) => name.to_string(),
        None => entity.index_name(),
    };
    format!("/index/{}/{}", entity.kind().resource(), encode_segment(&name))
}
