//! 延迟供应者
//!
//! 延迟供应者在首次调用前不解析目标绑定，用于打破依赖环。

use crate::arguments::downcast;
use crate::scope::Factory;
use infrastructure_common::{InjectResult, Key};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 延迟查找函数
pub type LookupFn = Arc<dyn Fn() -> InjectResult<Factory> + Send + Sync>;

/// 未类型化的延迟查找：键 + 解析构造函数的闭包
#[derive(Clone)]
pub struct DeferredLookup {
    key: Key,
    lookup: LookupFn,
}

impl DeferredLookup {
    /// 创建延迟查找
    pub fn new(key: Key, lookup: LookupFn) -> Self {
        Self { key, lookup }
    }

    /// 直接使用已知构造函数
    pub fn resolved(key: Key, factory: Factory) -> Self {
        Self {
            key,
            lookup: Arc::new(move || Ok(factory.clone())),
        }
    }

    /// 目标键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 执行查找
    pub fn resolve(&self) -> InjectResult<Factory> {
        (self.lookup)()
    }
}

impl fmt::Debug for DeferredLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredLookup").field("key", &self.key).finish()
    }
}

struct SupplierInner {
    lookup: DeferredLookup,
    factory: OnceCell<Factory>,
}

/// 类型化的延迟供应者
///
/// 构造函数只查找一次并缓存；每次 [`Supplier::get`] 都会调用它，
/// 因此复用策略完全由目标绑定的作用域决定。可跨线程克隆和并发调用。
pub struct Supplier<T: ?Sized> {
    inner: Arc<SupplierInner>,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: Any + Send + Sync> Supplier<T> {
    /// 从延迟查找创建
    pub fn new(lookup: DeferredLookup) -> Self {
        Self {
            inner: Arc::new(SupplierInner {
                lookup,
                factory: OnceCell::new(),
            }),
            _marker: PhantomData,
        }
    }

    /// 目标键
    pub fn key(&self) -> &Key {
        self.inner.lookup.key()
    }

    /// 获取实例
    pub fn get(&self) -> InjectResult<Arc<T>> {
        let factory = self
            .inner
            .factory
            .get_or_try_init(|| self.inner.lookup.resolve())?;
        let instance = factory()?;
        downcast::<T>(instance, &self.key().to_string())
    }
}

impl<T: ?Sized> Clone for Supplier<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Supplier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supplier")
            .field("key", self.inner.lookup.key())
            .field("resolved", &self.inner.factory.get().is_some())
            .finish()
    }
}
