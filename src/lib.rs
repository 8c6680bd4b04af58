//! GraphBatch - 图数据库 REST 批量端点的客户端事务层
//!
//! 将节点、关系与索引的变更累积为一个有序的批量请求，通过占位符在同一批次内
//! 引用尚未持久化的实体，并在响应返回后把服务端分配的身份写回内存实体。

pub mod api;
pub mod config;
pub mod core;
pub mod graph;
pub mod utils;
