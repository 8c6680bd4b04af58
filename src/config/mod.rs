use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub log: LogConfig,
}

/// 图数据库 REST 服务连接配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// REST 根路径
    pub db: String,
    pub content_type: String,
    pub accept_type: String,
    /// 是否发送值为 null 的属性
    pub allow_null_values: bool,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 7474,
            db: "db/data".to_string(),
            content_type: "application/json".to_string(),
            accept_type: "application/json".to_string(),
            allow_null_values: false,
            timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// 服务根地址，所有绝对地址都以此为前缀
    pub fn site(&self) -> String {
        let db = self.db.trim_matches('/');
        if db.is_empty() {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, self.host, self.port, db)
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphbatch".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if config.service.host.trim().is_empty() {
            return Err("服务主机名不能为空".into());
        }
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.service.host, "localhost");
        assert_eq!(config.service.port, 7474);
        assert!(!config.service.allow_null_values);
        assert_eq!(config.service.site(), "http://localhost:7474/db/data");
    }

    #[test]
    fn test_site_without_db_path() {
        let service = ServiceConfig {
            scheme: "https".to_string(),
            host: "graph.local".to_string(),
            port: 7473,
            db: "/".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(service.site(), "https://graph.local:7473");
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let mut config = Config::default();
        config.service.port = 8474;
        config.service.allow_null_values = true;
        config.save(temp_file.path()).expect("Failed to save config");

        let loaded_config =
            Config::load(temp_file.path()).expect("Failed to load config from temporary file");
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[service]\nhost = \"neo4j.internal\"\n")
            .expect("Failed to write TOML content to temporary file");

        let config = Config::load(temp_file.path()).expect("Failed to load partial config");
        assert_eq!(config.service.host, "neo4j.internal");
        assert_eq!(config.service.port, 7474);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_config_rejects_empty_host() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[service]\nhost = \"\"\n")
            .expect("Failed to write TOML content to temporary file");

        assert!(Config::load(temp_file.path()).is_err());
    }
}
