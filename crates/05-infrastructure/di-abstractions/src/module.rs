//! 模块：一组显式声明的工厂方法

use crate::injector::Injector;
use crate::scope::Singleton;
use infrastructure_common::{InjectError, InjectResult, Instance, Key, Qualifier, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 模块工厂函数，调用时可通过注入器获取其他依赖
pub type ModuleFactoryFn = Arc<dyn Fn(&dyn Injector) -> InjectResult<Instance> + Send + Sync>;

/// 模块 trait
pub trait Module: Send + Sync {
    /// 模块名称（用于错误信息）
    fn name(&self) -> &str;

    /// 声明工厂方法
    fn configure(&self, binder: &mut ModuleBinder);
}

/// 工厂方法声明
#[derive(Clone)]
pub struct FactoryMethod {
    method: String,
    key: Key,
    aliases: Vec<String>,
    scope: Option<TypeInfo>,
    factory: ModuleFactoryFn,
}

impl FactoryMethod {
    /// 名称限定符
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.key = self.key.clone().with_qualifier(Some(Qualifier::named(name)));
        self
    }

    /// 限定符种类
    pub fn qualified<Q: ?Sized + 'static>(&mut self) -> &mut Self {
        self.key = self.key.clone().with_qualifier(Some(Qualifier::kind::<Q>()));
        self
    }

    /// 别名：同类型、以别名限定的附加键，共享同一构造函数和作用域实例
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.aliases.push(alias.into());
        self
    }

    /// 单例作用域
    pub fn singleton(&mut self) -> &mut Self {
        self.scoped::<Singleton>()
    }

    /// 使用指定标记的作用域
    pub fn scoped<M: ?Sized + 'static>(&mut self) -> &mut Self {
        self.scope = Some(TypeInfo::of::<M>());
        self
    }

    /// 方法名称
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 主键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 主键与全部别名键
    pub fn keys(&self) -> Vec<Key> {
        std::iter::once(self.key.clone())
            .chain(self.aliases.iter().map(|alias| self.key.with_name(alias.clone())))
            .collect()
    }

    /// 作用域标记
    pub fn scope(&self) -> Option<&TypeInfo> {
        self.scope.as_ref()
    }

    /// 工厂函数
    pub fn factory(&self) -> &ModuleFactoryFn {
        &self.factory
    }
}

impl fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("method", &self.method)
            .field("key", &self.key)
            .field("aliases", &self.aliases)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// 收集模块声明的工厂方法
#[derive(Debug)]
pub struct ModuleBinder {
    module: String,
    methods: Vec<FactoryMethod>,
}

impl ModuleBinder {
    /// 为指定模块创建
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            methods: Vec::new(),
        }
    }

    /// 声明返回 `T` 的工厂方法
    pub fn factory<T, F>(&mut self, method: &str, factory: F) -> &mut FactoryMethod
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Injector) -> InjectResult<T> + Send + Sync + 'static,
    {
        let index = self.methods.len();
        self.methods.push(FactoryMethod {
            method: method.to_string(),
            key: Key::of::<T>(),
            aliases: Vec::new(),
            scope: None,
            factory: Arc::new(move |injector: &dyn Injector| {
                factory(injector).map(|value| Arc::new(value) as Instance)
            }),
        });
        &mut self.methods[index]
    }

    /// 模块名称
    pub fn module(&self) -> &str {
        &self.module
    }

    /// 已声明的工厂方法
    pub fn methods(&self) -> &[FactoryMethod] {
        &self.methods
    }

    /// 检查是否有两个方法产生同一个键（含别名）
    pub fn check_duplicates(&self) -> InjectResult<()> {
        for (i, first) in self.methods.iter().enumerate() {
            let first_keys = first.keys();
            for second in &self.methods[i + 1..] {
                if let Some(key) = second.keys().into_iter().find(|k| first_keys.contains(k)) {
                    return Err(InjectError::DuplicateFactory {
                        module: self.module.clone(),
                        key,
                        first: first.method.clone(),
                        second: second.method.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 检查后取出全部工厂方法
    pub fn into_methods(self) -> InjectResult<Vec<FactoryMethod>> {
        self.check_duplicates()?;
        debug!(module = %self.module, count = self.methods.len(), "模块工厂方法收集完成");
        Ok(self.methods)
    }
}
