//! 运行时配置
//!
//! 加载顺序（后者覆盖前者）：内置默认值、可选的 TOML 文件、环境变量。
//! 环境变量以 `WIRING_` 为前缀，嵌套字段用 `__` 分隔，例如
//! `WIRING_LOGGING__LEVEL=debug`；`WIRING_DESCRIPTOR_SOURCES` 用空格分隔多个路径。

use config::{Config, Environment, File, FileFormat};
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志过滤表达式（`RUST_LOG` 语法）
    pub level: String,
    /// 是否输出 JSON
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// 运行时配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// 插件描述文件（JSON）
    pub descriptor_sources: Vec<PathBuf>,
    /// 配置成功后是否报告未使用的属性和子元素
    pub report_unmatched: bool,
    /// 日志
    pub logging: LoggingSettings,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            descriptor_sources: Vec::new(),
            report_unmatched: true,
            logging: LoggingSettings::default(),
        }
    }
}

/// 配置加载器
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl SettingsLoader {
    /// 默认环境变量前缀
    pub const DEFAULT_ENV_PREFIX: &'static str = "WIRING";

    /// 使用默认环境变量前缀、不读取文件的加载器
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: Self::DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// 指定 TOML 配置文件；文件必须存在
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// 环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 加载配置
    pub fn load(&self) -> InfrastructureResult<RuntimeSettings> {
        let defaults = toml::to_string(&RuntimeSettings::default()).map_err(settings_error)?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(InfrastructureError::Settings {
                    message: format!("配置文件不存在: {}", path.display()),
                });
            }
            info!("加载运行时配置文件: {}", path.display());
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("descriptor_sources"),
        );

        let settings: RuntimeSettings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(settings_error)?;
        debug!(?settings, "运行时配置加载完成");
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_error(error: impl std::fmt::Display) -> InfrastructureError {
    InfrastructureError::Settings {
        message: error.to_string(),
    }
}
