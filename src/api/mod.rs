//! 传输层接口
//!
//! `Connection` 是批量事务唯一依赖的外部协作者，`HttpConnection` 是基于 reqwest 的实现

pub mod connection;
pub mod graph_service;
pub mod http_connection;

pub use connection::Connection;
pub use graph_service::GraphService;
pub use http_connection::HttpConnection;
