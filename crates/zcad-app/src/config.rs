//! 命令行工具配置
//!
//! 配置文件为 JSON，所有字段都有默认值。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;
use zcad_kernel::snap::SnapConfig;
use zcad_viewer::RenderConfig;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub snap: SnapConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// 自动发现配置文件：优先读取环境变量 `ZCAD_CONFIG`，否则寻找 `./config/zcad.json`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("ZCAD_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("zcad.json"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    /// 解析日志等级
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(self.level.trim()).map_err(|_| ConfigError::InvalidLevel(self.level.clone()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析配置文件失败 {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("无效的日志等级: {0}")]
    InvalidLevel(String),

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.snap, SnapConfig::default());
        assert_eq!(config.render.min_screen_radius, None);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_json(
            r#"{
                "logging": { "level": "debug" },
                "snap": { "max_snap_points": 3 },
                "render": { "min_screen_radius": 1.5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.logging.max_level().unwrap(), Level::DEBUG);
        assert_eq!(config.snap.max_snap_points, 3);
        assert_eq!(config.snap.min_distance_to_snap, SnapConfig::default().min_distance_to_snap);
        assert_eq!(config.render.min_screen_radius, Some(1.5));
        assert_eq!(config.render.ellipse_segments, 64);
    }

    #[test]
    fn test_invalid_level() {
        let logging = LoggingConfig {
            level: "loud".to_string(),
        };
        assert!(matches!(logging.max_level(), Err(ConfigError::InvalidLevel(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/zcad.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
