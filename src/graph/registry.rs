//! 实例注册表
//!
//! 记录每个占位符 ID 对应的内存实体，以及每个实体在本批次中获得的占位符。
//! 占位符只存在于这张由事务独占的侧表中，实体本身不保存任何批次状态。

use std::collections::{BTreeMap, HashMap};

use super::batch_operation::PlaceholderId;
use super::entity::{EntityHandle, EntityKey};
use super::response::BatchResponse;

#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<PlaceholderId, EntityHandle>,
    placeholders: HashMap<EntityKey, PlaceholderId>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记实体，同一实体再次登记时以最新的占位符为准
    pub fn register(&mut self, id: PlaceholderId, entity: EntityHandle) {
        self.placeholders.insert(entity.key(), id);
        self.instances.insert(id, entity);
    }

    pub fn placeholder_of(&self, key: EntityKey) -> Option<PlaceholderId> {
        self.placeholders.get(&key).copied()
    }

    pub fn get(&self, id: PlaceholderId) -> Option<&EntityHandle> {
        self.instances.get(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 清除所有占位符，只保留协调所需的实例表
    pub fn seal(self) -> SealedRegistry {
        SealedRegistry {
            instances: self.instances,
        }
    }
}

/// 已清除占位符的注册表，只能用于协调响应
#[derive(Debug)]
pub struct SealedRegistry {
    instances: BTreeMap<PlaceholderId, EntityHandle>,
}

impl SealedRegistry {
    /// 将响应中新分配的地址写回对应实体，返回写回的数量
    ///
    /// 没有对应登记实体或不带 `self` 地址的结果会被忽略
    pub fn reconcile(&self, response: &BatchResponse) -> usize {
        let mut assigned = 0;
        for result in response.iter() {
            let Some(id) = result.id else { continue };
            let Some(entity) = self.instances.get(&id) else {
                continue;
            };
            if let Some(locator) = result.self_locator() {
                log::trace!("操作 {} 的 {} 获得身份 {}", id, entity.kind(), locator);
                entity.assign_identity(locator.to_string());
                assigned += 1;
            }
        }
        assigned
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
