//! 作用域抽象
//!
//! 作用域是纯策略对象：把未作用域化的构造函数包装成具有复用策略的构造函数。

use infrastructure_common::{InjectResult, Instance, Key};
use std::any::Any;
use std::sync::Arc;

/// 构造函数（未调用前不产生任何副作用）
pub type Factory = Arc<dyn Fn() -> InjectResult<Instance> + Send + Sync>;

/// 把返回具体类型的闭包包装成 [`Factory`]
pub fn factory_fn<T, F>(f: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn() -> InjectResult<T> + Send + Sync + 'static,
{
    Arc::new(move || f().map(|value| Arc::new(value) as Instance))
}

/// 作用域 trait
pub trait Scope: Send + Sync {
    /// 作用域名称（用于日志）
    fn name(&self) -> &str;

    /// 为指定键包装构造函数
    fn scope(&self, key: &Key, unscoped: Factory) -> Factory;
}

/// 单例作用域标记
///
/// 构造点声明 `.singleton()` 时使用此标记查找作用域。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Singleton;
