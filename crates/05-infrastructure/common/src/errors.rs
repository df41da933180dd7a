//! 错误类型定义

use crate::metadata::Key;
use thiserror::Error;

/// 依赖注入错误类型
///
/// 除 [`InjectError::Validation`] 外均为结构性错误，直接返回给调用者。
#[derive(Error, Debug, Clone)]
pub enum InjectError {
    #[error("重复绑定: {key}, 已有来源: {existing_source}, 新来源: {new_source}")]
    DuplicateBinding {
        key: Key,
        existing_source: String,
        new_source: String,
    },

    #[error("模块 {module} 中存在重复的工厂方法: {key}, 方法: {first} 与 {second}")]
    DuplicateFactory {
        module: String,
        key: Key,
        first: String,
        second: String,
    },

    #[error("没有可用的构造点: {key}")]
    NoConstructionPoint { key: Key },

    #[error("循环依赖检测到: {}", format_chain(.chain))]
    CircularDependency { chain: Vec<Key> },

    #[error("验证失败: {target}, 原因: {}", .failures.join("; "))]
    Validation {
        target: String,
        failures: Vec<String>,
    },

    #[error("组件创建失败: {type_name}, 原因: {message}")]
    ConstructionFailed { type_name: String, message: String },

    #[error("注入点类型不匹配: {point}, 期望类型: {expected}")]
    TypeMismatch { point: String, expected: String },

    #[error("注入点没有可用的值: {point}")]
    MissingValue { point: String },

    #[error("节点没有对应的插件类型: {node}")]
    MissingPluginType { node: String },

    #[error("注入器已被释放, 无法解析延迟依赖: {key}")]
    InjectorDropped { key: Key },
}

fn format_chain(chain: &[Key]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl InjectError {
    /// 创建组件创建失败错误
    pub fn construction_failed(type_name: impl Into<String>, message: impl ToString) -> Self {
        Self::ConstructionFailed {
            type_name: type_name.into(),
            message: message.to_string(),
        }
    }

    /// 创建单条原因的验证失败错误
    pub fn validation(target: impl Into<String>, failure: impl Into<String>) -> Self {
        Self::Validation {
            target: target.into(),
            failures: vec![failure.into()],
        }
    }

    /// 是否为验证失败（而非结构性错误）
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// 插件描述缓存错误类型
#[derive(Error, Debug)]
pub enum PluginCacheError {
    #[error("插件描述文件读取失败: {path}, 原因: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("插件描述文件写入失败: {path}, 原因: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("插件描述解析失败: {path}, 原因: {message}")]
    Parse { path: String, message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("依赖注入错误: {0}")]
    Inject(#[from] InjectError),

    #[error("插件描述错误: {0}")]
    PluginCache(#[from] PluginCacheError),

    #[error("运行时设置加载失败: {message}")]
    Settings { message: String },
}

/// 依赖注入结果类型
pub type InjectResult<T> = Result<T, InjectError>;

/// 插件描述缓存结果类型
pub type PluginCacheResult<T> = Result<T, PluginCacheError>;

/// 基础设施结果类型
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
