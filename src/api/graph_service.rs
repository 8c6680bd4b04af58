use std::path::Path;

use log::info;

use super::connection::Connection;
use super::http_connection::HttpConnection;
use crate::config::{Config, ServiceConfig};
use crate::core::TransportError;
use crate::graph::BatchTransaction;
use crate::utils::logging;

/// 图数据库 REST 服务
///
/// 持有服务配置与 HTTP 连接，并负责创建绑定到该连接的批量事务
pub struct GraphService {
    config: ServiceConfig,
    connection: HttpConnection,
}

impl GraphService {
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let connection = HttpConnection::new(config)?;
        info!("图服务连接已创建: {}", connection.site());
        Ok(Self {
            config: config.clone(),
            connection,
        })
    }

    /// 从配置文件启动服务
    ///
    /// 先按 `[log]` 段启动文件日志，再按 `[service]` 段建立连接
    pub fn start<P: AsRef<Path>>(config_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load(config_path)?;
        logging::init(&config.log)?;
        Ok(Self::new(&config.service)?)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn connection(&self) -> &HttpConnection {
        &self.connection
    }

    pub fn site(&self) -> &str {
        self.connection.site()
    }

    /// 创建绑定到本服务连接的批量事务
    pub fn create_batch_transaction(&self) -> BatchTransaction<&HttpConnection> {
        BatchTransaction::new(&self.connection)
    }
}
