//! 注入器集成测试
//!
//! 覆盖作用域、限定符、别名、延迟供应者、循环依赖和模块注册。

use di_abstractions::{
    ConstructionPoint, Factory, Injectable, InjectionPoint, Injector, InjectorExt, Module,
    ModuleBinder, Scope, StringSubstitutor, Supplier,
};
use di_impl::DefaultInjector;
use infrastructure_common::{InjectError, InjectResult, Instance, Key};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// 作用域
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct BeanA;

impl Injectable for BeanA {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>().singleton()
    }
}

#[derive(Debug, Default)]
struct BeanB;

impl Injectable for BeanB {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>().singleton()
    }
}

struct BeanC {
    a: Arc<BeanA>,
    b: Arc<BeanB>,
}

impl Injectable for BeanC {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![
                InjectionPoint::injectable::<BeanA>("a"),
                InjectionPoint::injectable::<BeanB>("b"),
            ],
            |args| {
                Ok(BeanC {
                    a: args.instance()?,
                    b: args.instance()?,
                })
            },
        )
    }
}

#[test]
fn test_constructor_injection_with_scopes() {
    let injector = DefaultInjector::new();
    let first = injector.get::<BeanC>().unwrap();
    let second = injector.get::<BeanC>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.a, &second.a));
    assert!(Arc::ptr_eq(&first.b, &second.b));
    assert!(Arc::ptr_eq(&first.a, &injector.get::<BeanA>().unwrap()));
}

#[test]
fn test_singleton_constructed_once_across_threads() {
    static CREATED: AtomicUsize = AtomicUsize::new(0);

    struct Expensive;

    impl Injectable for Expensive {
        fn construction_point() -> ConstructionPoint {
            ConstructionPoint::constructor(Vec::new(), |_| {
                CREATED.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(5));
                Ok(Expensive)
            })
            .singleton()
        }
    }

    let injector = DefaultInjector::new();
    let instances: Vec<Arc<Expensive>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| injector.get::<Expensive>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(CREATED.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

// ---------------------------------------------------------------------------
// 限定符
// ---------------------------------------------------------------------------

/// 限定符标记
struct SomeQualifier;

struct QualifiedBeanModule;

impl Module for QualifiedBeanModule {
    fn name(&self) -> &str {
        "QualifiedBeanModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        binder.factory("named_a", |_| Ok(BeanA)).named("a").singleton();
        binder
            .factory("qualified_b", |_| Ok(BeanB))
            .qualified::<SomeQualifier>()
            .singleton();
    }
}

struct NamedInjection {
    default_bean: Arc<BeanA>,
    named_bean: Arc<BeanA>,
}

impl Injectable for NamedInjection {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![
                InjectionPoint::injectable::<BeanA>("defaultBean"),
                InjectionPoint::dependency::<BeanA>("a").named("a"),
            ],
            |args| {
                Ok(NamedInjection {
                    default_bean: args.instance()?,
                    named_bean: args.instance()?,
                })
            },
        )
    }
}

struct QualifiedInjection {
    bean: Arc<BeanB>,
}

impl Injectable for QualifiedInjection {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::dependency::<BeanB>("bean").qualified::<SomeQualifier>()],
            |args| Ok(QualifiedInjection { bean: args.instance()? }),
        )
    }
}

fn qualified_injector() -> DefaultInjector {
    DefaultInjector::builder()
        .with_module(QualifiedBeanModule)
        .build()
        .unwrap()
}

#[test]
fn test_named_injection() {
    let injector = qualified_injector();
    let value = injector.get::<NamedInjection>().unwrap();

    assert!(Arc::ptr_eq(&value.default_bean, &injector.get::<BeanA>().unwrap()));
    let named = injector.get_instance::<BeanA>(&Key::named::<BeanA>("a")).unwrap();
    assert!(Arc::ptr_eq(&value.named_bean, &named));
    assert!(!Arc::ptr_eq(&value.default_bean, &value.named_bean));
}

#[test]
fn test_qualified_injection() {
    let injector = qualified_injector();
    let value = injector.get::<QualifiedInjection>().unwrap();

    let qualified = injector
        .get_instance::<BeanB>(&Key::qualified::<BeanB, SomeQualifier>())
        .unwrap();
    assert!(Arc::ptr_eq(&value.bean, &qualified));
    assert!(!Arc::ptr_eq(&value.bean, &injector.get::<BeanB>().unwrap()));
}

// ---------------------------------------------------------------------------
// 成员注入
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MethodInjection {
    a: Option<Arc<BeanA>>,
    initialized: bool,
}

impl Injectable for MethodInjection {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>()
            .method(
                "set_a",
                vec![InjectionPoint::injectable::<BeanA>("a")],
                |target: &mut MethodInjection, args| {
                    target.a = Some(args.instance()?);
                    Ok(())
                },
            )
            .method("init", Vec::new(), |target: &mut MethodInjection, _| {
                assert!(target.a.is_some(), "初始化钩子应在注入方法之后执行");
                target.initialized = true;
                Ok(())
            })
    }
}

#[test]
fn test_method_injection_and_init_hook() {
    let injector = DefaultInjector::new();
    let value = injector.get::<MethodInjection>().unwrap();

    assert!(value.initialized);
    assert!(Arc::ptr_eq(value.a.as_ref().unwrap(), &injector.get::<BeanA>().unwrap()));
}

#[derive(Default)]
struct FieldInjection {
    bean: Option<Arc<BeanA>>,
    named: Option<Arc<BeanA>>,
}

impl Injectable for FieldInjection {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>()
            .field(
                "bean",
                InjectionPoint::injectable::<BeanA>("bean"),
                |target: &mut FieldInjection, args| {
                    target.bean = Some(args.instance()?);
                    Ok(())
                },
            )
            .field(
                "named",
                InjectionPoint::dependency::<BeanA>("a").named("a"),
                |target: &mut FieldInjection, args| {
                    target.named = Some(args.instance()?);
                    Ok(())
                },
            )
    }
}

#[test]
fn test_field_injection() {
    let injector = qualified_injector();
    let value = injector.get::<FieldInjection>().unwrap();

    let bean = value.bean.as_ref().unwrap();
    let named = value.named.as_ref().unwrap();
    assert!(!Arc::ptr_eq(bean, named));
    assert!(Arc::ptr_eq(bean, &injector.get::<BeanA>().unwrap()));
}

// ---------------------------------------------------------------------------
// 模块
// ---------------------------------------------------------------------------

struct AmbiguousModule;

impl Module for AmbiguousModule {
    fn name(&self) -> &str {
        "AmbiguousModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        binder.factory("first", |_| Ok("first".to_string()));
        binder.factory("second", |_| Ok("second".to_string()));
    }
}

#[test]
fn test_ambiguous_module_is_rejected() {
    let error = DefaultInjector::builder()
        .with_module(AmbiguousModule)
        .build()
        .unwrap_err();

    match error {
        InjectError::DuplicateFactory {
            module,
            first,
            second,
            ..
        } => {
            assert_eq!(module, "AmbiguousModule");
            assert_eq!((first.as_str(), second.as_str()), ("first", "second"));
        }
        other => panic!("意外的错误: {other}"),
    }
}

struct ClassModule;

impl Module for ClassModule {
    fn name(&self) -> &str {
        "ClassModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        binder.factory("string", |_| Ok("hello".to_string()));
    }
}

#[test]
fn test_module_factory_binding() {
    let injector = DefaultInjector::builder()
        .with_module(ClassModule)
        .build()
        .unwrap();

    let value = injector.get_instance::<String>(&Key::of::<String>()).unwrap();
    assert_eq!(value.as_str(), "hello");
}

#[test]
fn test_failed_module_installs_nothing() {
    let injector = DefaultInjector::new();
    injector
        .bind_instance(Key::of::<String>(), "existing".to_string())
        .unwrap();

    let error = injector.install_module(&ClassModule).unwrap_err();
    assert!(matches!(error, InjectError::DuplicateBinding { .. }));
    let value = injector.get_instance::<String>(&Key::of::<String>()).unwrap();
    assert_eq!(value.as_str(), "existing");
}

struct Service {
    origin: &'static str,
}

impl Injectable for Service {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(vec![], |_| Ok(Service { origin: "implicit" })).singleton()
    }
}

struct ServiceModule {
    origin: &'static str,
}

impl Module for ServiceModule {
    fn name(&self) -> &str {
        "ServiceModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        let origin = self.origin;
        binder
            .factory("service", move |_| Ok(Service { origin }))
            .singleton();
    }
}

#[test]
fn test_explicit_singleton_replaces_implicit_singleton() {
    let injector = DefaultInjector::new();
    assert_eq!(injector.get::<Service>().unwrap().origin, "implicit");

    injector
        .install_module(&ServiceModule { origin: "module" })
        .unwrap();
    let first = injector.get::<Service>().unwrap();
    let second = injector.get::<Service>().unwrap();
    assert_eq!(first.origin, "module");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_module_reinstalled_from_same_source() {
    let injector = DefaultInjector::new();
    injector
        .install_module(&ServiceModule { origin: "first" })
        .unwrap();
    let first = injector.get_instance::<Service>(&Key::of::<Service>()).unwrap();
    assert_eq!(first.origin, "first");

    injector
        .install_module(&ServiceModule { origin: "second" })
        .unwrap();
    let second = injector.get_instance::<Service>(&Key::of::<Service>()).unwrap();
    assert_eq!(second.origin, "second");
    assert!(!Arc::ptr_eq(&first, &second));
}

// ---------------------------------------------------------------------------
// 循环依赖
// ---------------------------------------------------------------------------

struct CircularBeanA {
    _b: Arc<CircularBeanB>,
}

impl Injectable for CircularBeanA {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<CircularBeanB>("b")],
            |args| Ok(CircularBeanA { _b: args.instance()? }),
        )
    }
}

struct CircularBeanB {
    _a: Arc<CircularBeanA>,
}

impl Injectable for CircularBeanB {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<CircularBeanA>("a")],
            |args| Ok(CircularBeanB { _a: args.instance()? }),
        )
    }
}

#[test]
fn test_circular_dependency_detected() {
    let injector = DefaultInjector::new();
    let error = injector.get::<CircularBeanA>().err().unwrap();

    match &error {
        InjectError::CircularDependency { chain } => {
            assert_eq!(
                chain,
                &vec![
                    Key::of::<CircularBeanA>(),
                    Key::of::<CircularBeanB>(),
                    Key::of::<CircularBeanA>(),
                ]
            );
        }
        other => panic!("意外的错误: {other}"),
    }
    assert!(error.to_string().contains("循环依赖"));

    // 检测失败后栈已清空，无关类型仍可解析
    assert!(injector.get::<BeanC>().is_ok());
}

struct CircularSupplierBean {
    supplier: Supplier<CircularBean>,
}

impl Injectable for CircularSupplierBean {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<CircularBean>("bean").deferred()],
            |args| {
                Ok(CircularSupplierBean {
                    supplier: args.supplier()?,
                })
            },
        )
    }
}

struct CircularBean {
    _back: Arc<CircularSupplierBean>,
}

impl Injectable for CircularBean {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<CircularSupplierBean>("back")],
            |args| Ok(CircularBean { _back: args.instance()? }),
        )
    }
}

#[test]
fn test_deferred_supplier_breaks_cycle() {
    let injector = DefaultInjector::new();
    let bean = injector.get::<CircularSupplierBean>().unwrap();
    assert!(bean.supplier.get().is_ok());
}

struct SelfReferencingBean {
    _next: Arc<SelfReferencingBean>,
}

impl Injectable for SelfReferencingBean {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<SelfReferencingBean>("next")],
            |args| Ok(SelfReferencingBean { _next: args.instance()? }),
        )
    }
}

#[test]
fn test_self_dependency_detected() {
    let injector = DefaultInjector::new();
    let error = injector.get::<SelfReferencingBean>().err().unwrap();

    match &error {
        InjectError::CircularDependency { chain } => {
            assert_eq!(
                chain,
                &vec![
                    Key::of::<SelfReferencingBean>(),
                    Key::of::<SelfReferencingBean>(),
                ]
            );
        }
        other => panic!("意外的错误: {other}"),
    }
}

struct SlowDependency;

impl Injectable for SlowDependency {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(vec![], |_| {
            thread::sleep(Duration::from_millis(50));
            Ok(SlowDependency)
        })
    }
}

struct SingletonCycleA {
    _slow: Arc<SlowDependency>,
    _b: Arc<SingletonCycleB>,
}

impl Injectable for SingletonCycleA {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![
                InjectionPoint::injectable::<SlowDependency>("slow"),
                InjectionPoint::injectable::<SingletonCycleB>("b"),
            ],
            |args| {
                Ok(SingletonCycleA {
                    _slow: args.instance()?,
                    _b: args.instance()?,
                })
            },
        )
        .singleton()
    }
}

struct SingletonCycleB {
    _slow: Arc<SlowDependency>,
    _a: Arc<SingletonCycleA>,
}

impl Injectable for SingletonCycleB {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![
                InjectionPoint::injectable::<SlowDependency>("slow"),
                InjectionPoint::injectable::<SingletonCycleA>("a"),
            ],
            |args| {
                Ok(SingletonCycleB {
                    _slow: args.instance()?,
                    _a: args.instance()?,
                })
            },
        )
        .singleton()
    }
}

#[test]
fn test_singleton_cycle_from_two_threads_fails_fast() {
    let injector = DefaultInjector::new();
    let barrier = Arc::new(Barrier::new(2));
    let (sender, receiver) = mpsc::channel();

    let spawn = |resolve: fn(&DefaultInjector) -> Option<String>| {
        let injector = injector.clone();
        let barrier = Arc::clone(&barrier);
        let sender = sender.clone();
        thread::spawn(move || {
            barrier.wait();
            // 接收端超时后发送失败无需处理
            let _ = sender.send(resolve(&injector));
        })
    };
    spawn(|injector| injector.get::<SingletonCycleA>().err().map(|e| e.to_string()));
    spawn(|injector| injector.get::<SingletonCycleB>().err().map(|e| e.to_string()));

    let mut messages: Vec<String> = (0..2)
        .map(|_| {
            receiver
                .recv_timeout(Duration::from_secs(5))
                .expect("两个线程都应在超时前返回")
                .expect("循环依赖应当失败")
        })
        .collect();
    messages.sort();
    assert_eq!(
        messages,
        vec![
            "循环依赖检测到: SingletonCycleA -> SingletonCycleB -> SingletonCycleA".to_string(),
            "循环依赖检测到: SingletonCycleB -> SingletonCycleA -> SingletonCycleB".to_string(),
        ]
    );
    assert!(!injector.has_binding(&Key::of::<SingletonCycleA>()));
    assert!(!injector.has_binding(&Key::of::<SingletonCycleB>()));
}

// ---------------------------------------------------------------------------
// 缺少构造点
// ---------------------------------------------------------------------------

struct UnknownInstance;

#[test]
fn test_unknown_instance_error() {
    let key = Key::of::<UnknownInstance>();
    let error = DefaultInjector::new()
        .get_instance::<UnknownInstance>(&key)
        .err()
        .unwrap();

    assert!(matches!(error, InjectError::NoConstructionPoint { key: ref k } if *k == key));
    assert!(error.to_string().contains("没有可用的构造点"));
}

// ---------------------------------------------------------------------------
// 延迟供应者与作用域
// ---------------------------------------------------------------------------

struct IdModule {
    counter: Arc<AtomicI32>,
}

impl Module for IdModule {
    fn name(&self) -> &str {
        "IdModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        let counter = Arc::clone(&self.counter);
        binder.factory("next_id", move |_| Ok(counter.fetch_add(1, Ordering::SeqCst) + 1));
    }
}

struct DeferredSingleton {
    id: i32,
}

impl Injectable for DeferredSingleton {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(vec![InjectionPoint::dependency::<i32>("id")], |args| {
            Ok(DeferredSingleton { id: args.value()? })
        })
        .singleton()
    }
}

struct DeferredDependent {
    id: i32,
}

impl Injectable for DeferredDependent {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(vec![InjectionPoint::dependency::<i32>("id")], |args| {
            Ok(DeferredDependent { id: args.value()? })
        })
    }
}

#[derive(Default)]
struct DeferredSupplierBean {
    singleton_supplier: Option<Supplier<DeferredSingleton>>,
    dependent_supplier: Option<Supplier<DeferredDependent>>,
    method_supplier: Option<Supplier<DeferredDependent>>,
}

impl DeferredSupplierBean {
    fn singleton_id(&self) -> i32 {
        self.singleton_supplier.as_ref().unwrap().get().unwrap().id
    }

    fn dependent_id(&self) -> i32 {
        self.dependent_supplier.as_ref().unwrap().get().unwrap().id
    }
}

impl Injectable for DeferredSupplierBean {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>()
            .field(
                "singleton_supplier",
                InjectionPoint::injectable::<DeferredSingleton>("singletonSupplier").deferred(),
                |target: &mut DeferredSupplierBean, args| {
                    target.singleton_supplier = Some(args.supplier()?);
                    Ok(())
                },
            )
            .field(
                "dependent_supplier",
                InjectionPoint::injectable::<DeferredDependent>("dependentSupplier").deferred(),
                |target: &mut DeferredSupplierBean, args| {
                    target.dependent_supplier = Some(args.supplier()?);
                    Ok(())
                },
            )
            .method(
                "set_method_supplier",
                vec![InjectionPoint::injectable::<DeferredDependent>("supplier").deferred()],
                |target: &mut DeferredSupplierBean, args| {
                    target.method_supplier = Some(args.supplier()?);
                    Ok(())
                },
            )
    }
}

#[test]
fn test_deferred_suppliers_follow_target_scope() {
    let counter = Arc::new(AtomicI32::new(0));
    let injector = DefaultInjector::builder()
        .with_module(IdModule {
            counter: Arc::clone(&counter),
        })
        .build()
        .unwrap();

    let bean = injector.get::<DeferredSupplierBean>().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(bean.singleton_id(), 1);
    assert_eq!(bean.singleton_id(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    assert_eq!(bean.dependent_id(), 2);
    assert_eq!(bean.singleton_id(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(bean.dependent_id(), 3);
    assert_eq!(bean.dependent_id(), 4);

    let method_supplied = bean.method_supplier.as_ref().unwrap().get().unwrap();
    assert_eq!(method_supplied.id, 5);
}

struct Primary;

impl Injectable for Primary {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(Vec::new(), |_| Ok(Primary))
    }
}

struct Secondary {
    primary: Arc<Primary>,
}

impl Injectable for Secondary {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(vec![InjectionPoint::injectable::<Primary>("primary")], |args| {
            Ok(Secondary {
                primary: args.instance()?,
            })
        })
    }
}

struct Tertiary {
    secondary: Arc<Secondary>,
}

impl Injectable for Tertiary {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::injectable::<Secondary>("secondary")],
            |args| {
                Ok(Tertiary {
                    secondary: args.instance()?,
                })
            },
        )
    }
}

#[test]
fn test_chained_dependencies() -> anyhow::Result<()> {
    let injector = DefaultInjector::new();
    let tertiary = injector.get::<Tertiary>()?;
    assert_eq!(Arc::strong_count(&tertiary.secondary.primary), 1);
    assert_eq!(injector.binding_count(), 3);
    Ok(())
}

// ---------------------------------------------------------------------------
// 别名
// ---------------------------------------------------------------------------

struct AliasModule;

impl Module for AliasModule {
    fn name(&self) -> &str {
        "AliasModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        binder
            .factory("foo", |_| Ok("bar".to_string()))
            .named("foo")
            .alias("bar");
    }
}

#[derive(Default)]
struct Aliases {
    foo: String,
    bar: String,
    baz: String,
    constructed: String,
    method_injected: String,
}

impl Injectable for Aliases {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::dependency::<String>("constructed")
                .named("constructed")
                .alias("foo")],
            |args| {
                Ok(Aliases {
                    constructed: args.value()?,
                    ..Aliases::default()
                })
            },
        )
        .field(
            "foo",
            InjectionPoint::dependency::<String>("foo").named("foo"),
            |target: &mut Aliases, args| {
                target.foo = args.value()?;
                Ok(())
            },
        )
        .field(
            "bar",
            InjectionPoint::dependency::<String>("bar").named("bar"),
            |target: &mut Aliases, args| {
                target.bar = args.value()?;
                Ok(())
            },
        )
        .field(
            "baz",
            InjectionPoint::dependency::<String>("baz")
                .named("invalid")
                .alias("foo"),
            |target: &mut Aliases, args| {
                target.baz = args.value()?;
                Ok(())
            },
        )
        .method(
            "set_method_injected",
            vec![InjectionPoint::dependency::<String>("methodInjected")
                .named("baz")
                .alias("bar")],
            |target: &mut Aliases, args| {
                target.method_injected = args.value()?;
                Ok(())
            },
        )
    }
}

#[test]
fn test_aliases() -> anyhow::Result<()> {
    let injector = DefaultInjector::builder().with_module(AliasModule).build()?;

    let aliases = injector.get::<Aliases>()?;
    for value in [
        &aliases.foo,
        &aliases.bar,
        &aliases.baz,
        &aliases.constructed,
        &aliases.method_injected,
    ] {
        assert_eq!(value, "bar");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 自定义作用域
// ---------------------------------------------------------------------------

/// 自定义作用域标记
struct CustomSingleton;

#[derive(Default)]
struct CustomSingletonScope {
    instances: Arc<Mutex<HashMap<Key, Instance>>>,
}

impl Scope for CustomSingletonScope {
    fn name(&self) -> &str {
        "CustomSingleton"
    }

    fn scope(&self, key: &Key, unscoped: Factory) -> Factory {
        let instances = Arc::clone(&self.instances);
        let key = key.clone();
        Arc::new(move || -> InjectResult<Instance> {
            if let Some(instance) = instances.lock().get(&key) {
                return Ok(Arc::clone(instance));
            }
            let created = unscoped()?;
            Ok(Arc::clone(
                instances.lock().entry(key.clone()).or_insert(created),
            ))
        })
    }
}

#[derive(Default)]
struct CustomInstance;

impl Injectable for CustomInstance {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::default_constructor::<Self>().scoped::<CustomSingleton>()
    }
}

#[test]
fn test_custom_scope() {
    let injector = DefaultInjector::new();
    injector.register_scope_for::<CustomSingleton>(CustomSingletonScope::default());

    let factory = injector.factory_of::<CustomInstance>().unwrap();
    let first = factory().unwrap();
    let second = factory().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let typed = injector.get::<CustomInstance>().unwrap();
    let erased: Instance = typed;
    assert!(Arc::ptr_eq(&first, &erased));
}

// ---------------------------------------------------------------------------
// 字符串替换
// ---------------------------------------------------------------------------

struct UppercaseModule;

impl Module for UppercaseModule {
    fn name(&self) -> &str {
        "UppercaseModule"
    }

    fn configure(&self, binder: &mut ModuleBinder) {
        binder
            .factory("substitutor", |_| Ok(StringSubstitutor::new(|s| s.to_uppercase())))
            .named(StringSubstitutor::NAME);
    }
}

#[test]
fn test_named_substitutor_binding() {
    let injector = DefaultInjector::builder()
        .with_module(UppercaseModule)
        .build()
        .unwrap();

    let substitutor = injector
        .get_instance::<StringSubstitutor>(&StringSubstitutor::key())
        .unwrap();
    assert_eq!(substitutor.substitute("foo"), "FOO");

    let error = injector
        .get_instance::<StringSubstitutor>(&Key::of::<StringSubstitutor>())
        .unwrap_err();
    assert!(matches!(error, InjectError::NoConstructionPoint { .. }));
}

// ---------------------------------------------------------------------------
// 注入点验证
// ---------------------------------------------------------------------------

struct ValidatedInjectionPoints {
    foo: String,
    bar: String,
}

impl Injectable for ValidatedInjectionPoints {
    fn construction_point() -> ConstructionPoint {
        ConstructionPoint::constructor(
            vec![InjectionPoint::dependency::<String>("bar").named("bar").required()],
            |args| {
                Ok(ValidatedInjectionPoints {
                    foo: String::new(),
                    bar: args.value()?,
                })
            },
        )
        .field(
            "foo",
            InjectionPoint::dependency::<String>("foo").named("foo").required(),
            |target: &mut ValidatedInjectionPoints, args| {
                target.foo = args.value()?;
                Ok(())
            },
        )
    }
}

#[test]
fn test_injection_point_validation() {
    let injector = DefaultInjector::new();
    let error = injector.get::<ValidatedInjectionPoints>().err().unwrap();
    assert!(error.is_validation());

    injector
        .bind_instance(Key::named::<String>("foo"), "hello".to_string())
        .unwrap();
    let error = injector.get::<ValidatedInjectionPoints>().err().unwrap();
    assert!(error.is_validation());
    assert!(error.to_string().contains("bar"));

    injector
        .bind_instance(Key::named::<String>("bar"), "world".to_string())
        .unwrap();
    let value = injector.get::<ValidatedInjectionPoints>().unwrap();
    assert_eq!(value.foo, "hello");
    assert_eq!(value.bar, "world");
}
