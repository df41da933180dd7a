//! 绑定定义

use crate::scope::Factory;
use infrastructure_common::Key;
use std::fmt;

/// 绑定来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingOrigin {
    /// 显式注册（模块工厂方法或 `register_binding`）
    Explicit {
        /// 来源描述，例如 `QualifiedBeanModule::bean_a`
        source: String,
    },
    /// 由类型的构造点隐式合成
    Implicit,
}

impl BindingOrigin {
    /// 显式来源
    pub fn explicit(source: impl Into<String>) -> Self {
        Self::Explicit {
            source: source.into(),
        }
    }

    /// 是否显式注册
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit { .. })
    }
}

impl fmt::Display for BindingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit { source } => f.write_str(source),
            Self::Implicit => f.write_str("<implicit>"),
        }
    }
}

/// 绑定：键 + 已作用域化的构造函数
///
/// 注册后不可变。别名绑定共享同一个构造函数。
#[derive(Clone)]
pub struct Binding {
    key: Key,
    factory: Factory,
    origin: BindingOrigin,
}

impl Binding {
    /// 创建绑定
    pub fn new(key: Key, factory: Factory, origin: BindingOrigin) -> Self {
        Self {
            key,
            factory,
            origin,
        }
    }

    /// 绑定键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 构造函数
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// 来源
    pub fn origin(&self) -> &BindingOrigin {
        &self.origin
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
