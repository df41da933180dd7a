//! 默认注入器
//!
//! 绑定表以 [`Key`] 为键。显式绑定来自模块或 `bind` 调用；
//! 没有显式绑定的可注入类型在首次使用时生成隐式绑定。
//! 工厂闭包只持有注入器的弱引用，避免绑定表与注入器之间形成引用环。

use crate::guard::guarded;
use crate::scopes::{SingletonScope, UnscopedScope};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use di_abstractions::{
    downcast, Binding, BindingOrigin, ConstructionFn, Factory, Injector, Module, ModuleBinder,
    Scope, Singleton, StringSubstitutor,
};
use infrastructure_common::{
    Diagnostic, DiagnosticKind, DiagnosticReporter, EnvironmentPropertySource, InjectError,
    InjectResult, Key, PropertySource, TracingReporter, TypeInfo,
};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// 注入器内部状态
pub(crate) struct InjectorInner {
    bindings: DashMap<Key, Binding>,
    scopes: DashMap<TypeInfo, Arc<dyn Scope>>,
    constructions: DashMap<TypeInfo, ConstructionFn>,
    pub(crate) properties: Arc<dyn PropertySource>,
    pub(crate) reporter: Arc<dyn DiagnosticReporter>,
    pub(crate) report_unmatched: bool,
    pub(crate) self_ref: Weak<InjectorInner>,
}

impl InjectorInner {
    fn insert_binding(&self, binding: Binding) -> InjectResult<()> {
        match self.bindings.entry(binding.key().clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().origin() == binding.origin() {
                    debug!(key = %binding.key(), source = %binding.origin(), "同一来源重新注册绑定");
                    entry.insert(binding);
                    return Ok(());
                }
                if entry.get().origin().is_explicit() {
                    return Err(InjectError::DuplicateBinding {
                        key: binding.key().clone(),
                        existing_source: entry.get().origin().to_string(),
                        new_source: binding.origin().to_string(),
                    });
                }
                debug!(key = %binding.key(), source = %binding.origin(), "显式绑定替换隐式绑定");
                entry.insert(binding);
            }
            Entry::Vacant(entry) => {
                debug!(key = %binding.key(), source = %binding.origin(), "注册绑定");
                entry.insert(binding);
            }
        }
        Ok(())
    }

    /// 已有的、来源不同的显式绑定的来源
    fn conflicting_source(&self, key: &Key, source: &BindingOrigin) -> Option<String> {
        self.bindings
            .get(key)
            .filter(|binding| binding.origin().is_explicit() && binding.origin() != source)
            .map(|binding| binding.origin().to_string())
    }

    /// 按作用域标记查找作用域；未注册的标记按无作用域处理
    pub(crate) fn scope_for(&self, marker: Option<&TypeInfo>) -> Arc<dyn Scope> {
        let Some(marker) = marker else {
            return Arc::new(UnscopedScope);
        };
        match self.scopes.get(marker) {
            Some(scope) => Arc::clone(scope.value()),
            None => {
                warn!(scope = %marker, "作用域未注册, 按无作用域处理");
                Arc::new(UnscopedScope)
            }
        }
    }

    /// 已有绑定的工厂
    pub(crate) fn bound_factory(&self, key: &Key) -> Option<Factory> {
        self.bindings
            .get(key)
            .map(|binding| Arc::clone(binding.factory()))
    }

    /// 键上是否有显式绑定
    pub(crate) fn has_explicit_binding(&self, key: &Key) -> bool {
        self.bindings
            .get(key)
            .is_some_and(|binding| binding.origin().is_explicit())
    }

    /// 已登记的构造点函数
    pub(crate) fn registered_construction(&self, type_info: &TypeInfo) -> Option<ConstructionFn> {
        self.constructions.get(type_info).map(|c| *c.value())
    }

    /// 生成隐式绑定；并发创建时保留先写入的一方
    ///
    /// 构造图中存在非延迟的环时不生成绑定，直接返回循环依赖错误。
    pub(crate) fn implicit_factory(
        &self,
        key: &Key,
        construction: ConstructionFn,
    ) -> InjectResult<Factory> {
        self.check_acyclic(key, construction)?;
        let point = Arc::new(construction());
        let self_ref = self.self_ref.clone();
        let dropped = key.clone();
        let target = Arc::clone(&point);
        let unscoped: Factory = Arc::new(move || {
            let inner = self_ref.upgrade().ok_or_else(|| InjectError::InjectorDropped {
                key: dropped.clone(),
            })?;
            inner.construct(&target, None, &target.type_info().short_name())
        });
        let factory = guarded(key.clone(), self.scope_for(point.scope()).scope(key, unscoped));

        let binding = self.bindings.entry(key.clone()).or_insert_with(|| {
            debug!(key = %key, kind = ?point.kind(), "创建隐式绑定");
            Binding::new(key.clone(), factory, BindingOrigin::Implicit)
        });
        Ok(Arc::clone(binding.factory()))
    }

    /// 已绑定的字符串替换器
    pub(crate) fn substitutor(&self) -> Option<Arc<StringSubstitutor>> {
        let factory = self.bound_factory(&StringSubstitutor::key())?;
        match factory().and_then(|instance| downcast::<StringSubstitutor>(instance, StringSubstitutor::NAME)) {
            Ok(substitutor) => Some(substitutor),
            Err(error) => {
                warn!(%error, "字符串替换器不可用");
                None
            }
        }
    }

    /// 报告诊断
    pub(crate) fn report(&self, kind: DiagnosticKind, path: &str, message: impl Into<String>) {
        self.reporter.report(Diagnostic::new(kind, path, message));
    }
}

impl Injector for InjectorInner {
    fn register_binding(&self, key: Key, factory: Factory, source: &str) -> InjectResult<()> {
        let factory = guarded(key.clone(), factory);
        self.insert_binding(Binding::new(key, factory, BindingOrigin::explicit(source)))
    }

    fn register_scope(&self, marker: TypeInfo, scope: Arc<dyn Scope>) {
        info!(marker = %marker, scope = scope.name(), "注册作用域");
        self.scopes.insert(marker, scope);
    }

    fn install_module(&self, module: &dyn Module) -> InjectResult<()> {
        let mut binder = ModuleBinder::new(module.name());
        module.configure(&mut binder);
        let methods = binder.into_methods()?;

        // 先检查全部键，避免模块只安装了一半
        for method in &methods {
            let source = BindingOrigin::explicit(format!("{}::{}", module.name(), method.method()));
            for key in method.keys() {
                if let Some(existing_source) = self.conflicting_source(&key, &source) {
                    return Err(InjectError::DuplicateBinding {
                        key,
                        existing_source,
                        new_source: source.to_string(),
                    });
                }
            }
        }

        for method in &methods {
            let source = BindingOrigin::explicit(format!("{}::{}", module.name(), method.method()));
            let key = method.key().clone();
            let module_factory = Arc::clone(method.factory());
            let self_ref = self.self_ref.clone();
            let dropped = key.clone();
            let unscoped: Factory = Arc::new(move || {
                let inner = self_ref.upgrade().ok_or_else(|| InjectError::InjectorDropped {
                    key: dropped.clone(),
                })?;
                module_factory(inner.as_ref())
            });
            let factory = guarded(key.clone(), self.scope_for(method.scope()).scope(&key, unscoped));
            for alias in method.keys() {
                self.insert_binding(Binding::new(
                    alias,
                    Arc::clone(&factory),
                    source.clone(),
                ))?;
            }
        }

        info!(module = module.name(), methods = methods.len(), "模块安装完成");
        Ok(())
    }

    fn register_construction(&self, type_info: TypeInfo, construction: ConstructionFn) {
        self.constructions.insert(type_info, construction);
    }

    fn get_factory(&self, key: &Key) -> InjectResult<Factory> {
        if let Some(factory) = self.bound_factory(key) {
            return Ok(factory);
        }
        match self.registered_construction(key.type_info()) {
            Some(construction) => self.implicit_factory(key, construction),
            None => Err(InjectError::NoConstructionPoint { key: key.clone() }),
        }
    }

    fn has_binding(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }
}

/// 默认注入器
///
/// 克隆得到的句柄共享同一组绑定。
#[derive(Clone)]
pub struct DefaultInjector {
    pub(crate) inner: Arc<InjectorInner>,
}

impl DefaultInjector {
    /// 创建空注入器：环境变量属性源，通过 tracing 输出诊断
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(EnvironmentPropertySource),
            Arc::new(TracingReporter),
            true,
        )
    }

    /// 创建构建器
    pub fn builder() -> DefaultInjectorBuilder {
        DefaultInjectorBuilder::new()
    }

    fn from_parts(
        properties: Arc<dyn PropertySource>,
        reporter: Arc<dyn DiagnosticReporter>,
        report_unmatched: bool,
    ) -> Self {
        let inner = Arc::new_cyclic(|self_ref| InjectorInner {
            bindings: DashMap::new(),
            scopes: DashMap::new(),
            constructions: DashMap::new(),
            properties,
            reporter,
            report_unmatched,
            self_ref: self_ref.clone(),
        });
        inner
            .scopes
            .insert(TypeInfo::of::<Singleton>(), Arc::new(SingletonScope));
        Self { inner }
    }

    /// 绑定数量（含隐式绑定）
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.len()
    }

    /// 诊断报告器
    pub fn reporter(&self) -> &Arc<dyn DiagnosticReporter> {
        &self.inner.reporter
    }

    /// 属性源
    pub fn properties(&self) -> &Arc<dyn PropertySource> {
        &self.inner.properties
    }
}

impl Default for DefaultInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultInjector")
            .field("bindings", &self.inner.bindings.len())
            .field("scopes", &self.inner.scopes.len())
            .field("constructions", &self.inner.constructions.len())
            .finish()
    }
}

impl Injector for DefaultInjector {
    fn register_binding(&self, key: Key, factory: Factory, source: &str) -> InjectResult<()> {
        self.inner.register_binding(key, factory, source)
    }

    fn register_scope(&self, marker: TypeInfo, scope: Arc<dyn Scope>) {
        self.inner.register_scope(marker, scope)
    }

    fn install_module(&self, module: &dyn Module) -> InjectResult<()> {
        self.inner.install_module(module)
    }

    fn register_construction(&self, type_info: TypeInfo, construction: ConstructionFn) {
        self.inner.register_construction(type_info, construction)
    }

    fn get_factory(&self, key: &Key) -> InjectResult<Factory> {
        self.inner.get_factory(key)
    }

    fn has_binding(&self, key: &Key) -> bool {
        self.inner.has_binding(key)
    }
}

/// 注入器构建器
pub struct DefaultInjectorBuilder {
    modules: Vec<Box<dyn Module>>,
    scopes: Vec<(TypeInfo, Arc<dyn Scope>)>,
    properties: Option<Arc<dyn PropertySource>>,
    reporter: Option<Arc<dyn DiagnosticReporter>>,
    report_unmatched: bool,
}

impl DefaultInjectorBuilder {
    /// 创建构建器：默认属性源与报告器，报告未使用的配置
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            scopes: Vec::new(),
            properties: None,
            reporter: None,
            report_unmatched: true,
        }
    }

    /// 安装模块（按添加顺序）
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// 注册作用域
    pub fn with_scope<M: ?Sized + 'static>(mut self, scope: impl Scope + 'static) -> Self {
        self.scopes.push((TypeInfo::of::<M>(), Arc::new(scope)));
        self
    }

    /// 类级约束使用的属性源
    pub fn with_properties(mut self, properties: Arc<dyn PropertySource>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// 诊断报告器
    pub fn with_reporter(mut self, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// 配置成功后是否报告未使用的属性和子元素
    pub fn report_unmatched(mut self, enabled: bool) -> Self {
        self.report_unmatched = enabled;
        self
    }

    /// 构建注入器；模块冲突时失败
    pub fn build(self) -> InjectResult<DefaultInjector> {
        let injector = DefaultInjector::from_parts(
            self.properties
                .unwrap_or_else(|| Arc::new(EnvironmentPropertySource)),
            self.reporter.unwrap_or_else(|| Arc::new(TracingReporter)),
            self.report_unmatched,
        );
        for (marker, scope) in self.scopes {
            injector.register_scope(marker, scope);
        }
        for module in &self.modules {
            injector.install_module(module.as_ref())?;
        }
        info!(
            modules = self.modules.len(),
            bindings = injector.binding_count(),
            "注入器构建完成"
        );
        Ok(injector)
    }
}

impl Default for DefaultInjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
