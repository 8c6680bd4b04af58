//! 基于 reqwest 的阻塞 HTTP 连接

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use super::connection::Connection;
use crate::config::ServiceConfig;
use crate::core::TransportError;
use crate::graph::{BatchRequest, BatchResponse, Method};

pub struct HttpConnection {
    site: String,
    allow_null_values: bool,
    client: Client,
}

impl HttpConnection {
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, header_value(&config.content_type)?);
        headers.insert(ACCEPT, header_value(&config.accept_type)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            site: config.site(),
            allow_null_values: config.allow_null_values,
            client,
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|e| TransportError::Config(format!("无效的请求头 '{}': {}", value, e)))
}

impl Connection for HttpConnection {
    fn site(&self) -> &str {
        &self.site
    }

    fn allow_null_values(&self) -> bool {
        self.allow_null_values
    }

    fn execute(&self, request: &BatchRequest) -> Result<BatchResponse, TransportError> {
        debug!(
            "{} {} ({} 个操作)",
            request.method,
            request.uri,
            request.operations.len()
        );

        let builder = match request.method {
            Method::Get => self.client.get(&request.uri),
            Method::Post => self.client.post(&request.uri),
            Method::Put => self.client.put(&request.uri),
            Method::Delete => self.client.delete(&request.uri),
        };

        let response = builder.json(&request.operations).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("批量请求失败: {} {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
