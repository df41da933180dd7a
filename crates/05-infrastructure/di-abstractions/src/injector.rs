//! 注入器抽象接口
//!
//! [`Injector`] 保持对象安全，模块工厂函数通过 `&dyn Injector` 访问依赖；
//! 泛型便捷方法由 [`InjectorExt`] 提供。

use crate::arguments::downcast;
use crate::construction::{ConstructionFn, Injectable};
use crate::module::Module;
use crate::scope::{factory_fn, Factory, Scope};
use crate::supplier::{DeferredLookup, Supplier};
use infrastructure_common::{InjectResult, Instance, Key, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 注入器：绑定注册表 + 解析算法
pub trait Injector: Send + Sync {
    /// 注册显式绑定；键已有其他来源的显式绑定时返回重复绑定错误
    fn register_binding(&self, key: Key, factory: Factory, source: &str) -> InjectResult<()>;

    /// 注册自定义作用域；同一标记重复注册时后者覆盖前者
    fn register_scope(&self, marker: TypeInfo, scope: Arc<dyn Scope>);

    /// 安装模块
    fn install_module(&self, module: &dyn Module) -> InjectResult<()>;

    /// 登记类型的构造点，使未类型化的键也能隐式解析
    fn register_construction(&self, type_info: TypeInfo, construction: ConstructionFn);

    /// 获取（或惰性创建）已作用域化的构造函数，不调用它
    fn get_factory(&self, key: &Key) -> InjectResult<Factory>;

    /// 是否已有绑定（显式或已合成的隐式绑定）
    fn has_binding(&self, key: &Key) -> bool;

    /// 获取实例
    fn get_instance_erased(&self, key: &Key) -> InjectResult<Instance> {
        let factory = self.get_factory(key)?;
        factory()
    }
}

/// 注入器泛型便捷方法
pub trait InjectorExt: Injector {
    /// 按键获取实例
    fn get_instance<T: Any + Send + Sync>(&self, key: &Key) -> InjectResult<Arc<T>> {
        let instance = self.get_instance_erased(key)?;
        downcast::<T>(instance, &key.to_string())
    }

    /// 按可注入类型获取实例
    fn get<T: Injectable>(&self) -> InjectResult<Arc<T>> {
        self.register_type::<T>();
        self.get_instance::<T>(&Key::of::<T>())
    }

    /// 按可注入类型获取构造函数
    fn factory_of<T: Injectable>(&self) -> InjectResult<Factory> {
        self.register_type::<T>();
        self.get_factory(&Key::of::<T>())
    }

    /// 获取供应者
    ///
    /// 绑定在此处立即查找，键不可解析时直接返回错误；
    /// 实例在每次调用 `get` 时按绑定的作用域创建。
    fn get_supplier<T: Any + Send + Sync>(&self, key: Key) -> InjectResult<Supplier<T>> {
        let factory = self.get_factory(&key)?;
        Ok(Supplier::new(DeferredLookup::resolved(key, factory)))
    }

    /// 登记可注入类型
    fn register_type<T: Injectable>(&self) {
        self.register_construction(TypeInfo::of::<T>(), T::construction_point);
    }

    /// 以闭包注册显式绑定（未作用域化）
    fn bind<T, F>(&self, key: Key, factory: F) -> InjectResult<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> InjectResult<T> + Send + Sync + 'static,
    {
        self.register_binding(key, factory_fn(factory), "bind")
    }

    /// 绑定固定实例，每次返回同一个 `Arc`
    fn bind_instance<T: Any + Send + Sync>(&self, key: Key, value: T) -> InjectResult<()> {
        let instance: Instance = Arc::new(value);
        self.register_binding(key, Arc::new(move || Ok(Arc::clone(&instance))), "bind_instance")
    }

    /// 以标记类型注册自定义作用域
    fn register_scope_for<M: ?Sized + 'static>(&self, scope: impl Scope + 'static) {
        self.register_scope(TypeInfo::of::<M>(), Arc::new(scope));
    }
}

impl<I: Injector + ?Sized> InjectorExt for I {}
