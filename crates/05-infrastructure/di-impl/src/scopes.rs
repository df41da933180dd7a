//! 内置作用域

use di_abstractions::{Factory, Scope};
use infrastructure_common::{Instance, Key};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// 不缓存：每次调用都创建新实例
#[derive(Debug, Default, Clone, Copy)]
pub struct UnscopedScope;

impl Scope for UnscopedScope {
    fn name(&self) -> &str {
        "Unscoped"
    }

    fn scope(&self, _key: &Key, unscoped: Factory) -> Factory {
        unscoped
    }
}

/// 单例作用域
///
/// 每次 [`Scope::scope`] 调用产生一个独立的缓存单元，缓存随绑定存在：
/// 替换绑定后旧实例不再可见。并发的首次调用中只有一个会执行底层工厂，
/// 其余调用等待并得到同一个实例。底层工厂失败时不缓存结果。
#[derive(Debug, Default, Clone, Copy)]
pub struct SingletonScope;

impl Scope for SingletonScope {
    fn name(&self) -> &str {
        "Singleton"
    }

    fn scope(&self, _key: &Key, unscoped: Factory) -> Factory {
        let cell: Arc<OnceCell<Instance>> = Arc::new(OnceCell::new());
        Arc::new(move || cell.get_or_try_init(|| unscoped()).cloned())
    }
}
