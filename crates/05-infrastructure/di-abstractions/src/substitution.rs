//! 字符串替换
//!
//! 注入器中存在以 [`StringSubstitutor::NAME`] 命名的绑定时，
//! 属性值和文本值在转换前先经过替换。

use infrastructure_common::Key;
use std::fmt;
use std::sync::Arc;

/// 字符串替换函数
#[derive(Clone)]
pub struct StringSubstitutor {
    substitute: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl StringSubstitutor {
    /// 绑定名称
    pub const NAME: &'static str = "StringSubstitutor";

    /// 从函数创建
    pub fn new(substitute: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            substitute: Arc::new(substitute),
        }
    }

    /// 原样返回
    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    /// 绑定键
    pub fn key() -> Key {
        Key::named::<Self>(Self::NAME)
    }

    /// 执行替换
    pub fn substitute(&self, input: &str) -> String {
        (self.substitute)(input)
    }
}

impl fmt::Debug for StringSubstitutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StringSubstitutor")
    }
}
