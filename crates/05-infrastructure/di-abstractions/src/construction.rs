//! 构造点描述
//!
//! 构造点说明如何创建某个类型的实例：构造函数、静态工厂或构建器，
//! 以及构造后按声明顺序执行的字段注入和方法注入。
//!
//! ```ignore
//! impl Injectable for MethodInjection {
//!     fn construction_point() -> ConstructionPoint {
//!         ConstructionPoint::default_constructor::<Self>()
//!             .method("set_a", vec![InjectionPoint::injectable::<BeanA>("a")], |bean: &mut Self, args| {
//!                 bean.a = Some(args.instance()?);
//!                 Ok(())
//!             })
//!             .method("init", Vec::new(), |bean: &mut Self, _| {
//!                 bean.init_called = true;
//!                 Ok(())
//!             })
//!     }
//! }
//! ```

use crate::arguments::Arguments;
use crate::injection::{Constraint, InjectionPoint};
use crate::scope::Singleton;
use infrastructure_common::{InjectError, InjectResult, Instance, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 构造点函数
pub type ConstructionFn = fn() -> ConstructionPoint;

/// 创建阶段：从参数生成目标实例或构建器
pub type CreateFn = Arc<dyn Fn(&mut Arguments) -> InjectResult<Box<dyn Any + Send>> + Send + Sync>;

/// 成员注入：作用于创建阶段的值
pub type ApplyFn =
    Arc<dyn Fn(&mut (dyn Any + Send), &mut Arguments) -> InjectResult<()> + Send + Sync>;

/// 完成阶段：构建器生成最终实例，或直接包装
pub type FinishFn = Arc<dyn Fn(Box<dyn Any + Send>) -> InjectResult<Instance> + Send + Sync>;

/// 可注入类型
pub trait Injectable: Any + Send + Sync {
    /// 类型的构造点
    fn construction_point() -> ConstructionPoint;
}

/// 实例创建方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    /// 构造函数
    Constructor,
    /// 静态工厂方法
    Factory,
    /// 工厂方法返回构建器，成员注入作用于构建器
    Builder,
}

/// 成员注入种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// 字段
    Field,
    /// 方法
    Method,
}

/// 成员注入点
#[derive(Clone)]
pub struct MemberPoint {
    name: String,
    kind: MemberKind,
    points: Vec<InjectionPoint>,
    apply: ApplyFn,
}

impl MemberPoint {
    /// 成员名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 成员种类
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// 成员的注入点
    pub fn points(&self) -> &[InjectionPoint] {
        &self.points
    }

    /// 对创建阶段的值执行注入
    pub fn apply(&self, stage: &mut (dyn Any + Send), arguments: &mut Arguments) -> InjectResult<()> {
        (self.apply)(stage, arguments)
    }
}

impl fmt::Debug for MemberPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberPoint")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

/// 构造点
///
/// 每个类型只生成一次，之后作为只读元数据使用。
#[derive(Clone)]
pub struct ConstructionPoint {
    type_info: TypeInfo,
    kind: InjectionKind,
    scope: Option<TypeInfo>,
    parameters: Vec<InjectionPoint>,
    create: CreateFn,
    members: Vec<MemberPoint>,
    finish: FinishFn,
    constraints: Vec<Constraint>,
}

impl ConstructionPoint {
    fn staged<T, S, C, B>(kind: InjectionKind, parameters: Vec<InjectionPoint>, create: C, build: B) -> Self
    where
        T: Any + Send + Sync,
        S: Any + Send,
        C: Fn(&mut Arguments) -> InjectResult<S> + Send + Sync + 'static,
        B: Fn(S) -> InjectResult<T> + Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<T>();
        Self {
            type_info,
            kind,
            scope: None,
            parameters,
            create: Arc::new(move |args: &mut Arguments| {
                create(args).map(|stage| Box::new(stage) as Box<dyn Any + Send>)
            }),
            members: Vec::new(),
            finish: Arc::new(move |stage: Box<dyn Any + Send>| {
                let stage = stage
                    .downcast::<S>()
                    .map_err(|_| stage_mismatch::<S>(&type_info))?;
                build(*stage).map(|value| Arc::new(value) as Instance)
            }),
            constraints: Vec::new(),
        }
    }

    /// 构造函数注入
    pub fn constructor<T, F>(parameters: Vec<InjectionPoint>, create: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&mut Arguments) -> InjectResult<T> + Send + Sync + 'static,
    {
        Self::staged(InjectionKind::Constructor, parameters, create, Ok)
    }

    /// 无参构造函数
    pub fn default_constructor<T: Default + Any + Send + Sync>() -> Self {
        Self::constructor(Vec::new(), |_| Ok(T::default()))
    }

    /// 静态工厂方法
    pub fn factory<T, F>(parameters: Vec<InjectionPoint>, create: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&mut Arguments) -> InjectResult<T> + Send + Sync + 'static,
    {
        Self::staged(InjectionKind::Factory, parameters, create, Ok)
    }

    /// 构建器：成员注入作用于构建器 `B`，最后调用 `build` 生成 `T`
    pub fn builder<T, B, F, G>(new_builder: F, build: G) -> Self
    where
        T: Any + Send + Sync,
        B: Any + Send,
        F: Fn() -> B + Send + Sync + 'static,
        G: Fn(B) -> InjectResult<T> + Send + Sync + 'static,
    {
        Self::staged(InjectionKind::Builder, Vec::new(), move |_| Ok(new_builder()), build)
    }

    fn member<S, F>(mut self, name: &str, kind: MemberKind, points: Vec<InjectionPoint>, apply: F) -> Self
    where
        S: Any + Send,
        F: Fn(&mut S, &mut Arguments) -> InjectResult<()> + Send + Sync + 'static,
    {
        let type_info = self.type_info;
        self.members.push(MemberPoint {
            name: name.to_string(),
            kind,
            points,
            apply: Arc::new(move |stage: &mut (dyn Any + Send), args: &mut Arguments| {
                let stage = stage
                    .downcast_mut::<S>()
                    .ok_or_else(|| stage_mismatch::<S>(&type_info))?;
                apply(stage, args)
            }),
        });
        self
    }

    /// 字段注入
    pub fn field<S, F>(self, name: &str, point: InjectionPoint, apply: F) -> Self
    where
        S: Any + Send,
        F: Fn(&mut S, &mut Arguments) -> InjectResult<()> + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Field, vec![point], apply)
    }

    /// 方法注入；无参数的方法作为初始化钩子
    pub fn method<S, F>(self, name: &str, points: Vec<InjectionPoint>, apply: F) -> Self
    where
        S: Any + Send,
        F: Fn(&mut S, &mut Arguments) -> InjectResult<()> + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Method, points, apply)
    }

    /// 单例作用域
    pub fn singleton(self) -> Self {
        self.scoped::<Singleton>()
    }

    /// 使用指定标记的作用域
    pub fn scoped<M: ?Sized + 'static>(mut self) -> Self {
        self.scope = Some(TypeInfo::of::<M>());
        self
    }

    /// 类级约束
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// 目标类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 创建方式
    pub fn kind(&self) -> InjectionKind {
        self.kind
    }

    /// 作用域标记
    pub fn scope(&self) -> Option<&TypeInfo> {
        self.scope.as_ref()
    }

    /// 创建阶段的参数
    pub fn parameters(&self) -> &[InjectionPoint] {
        &self.parameters
    }

    /// 成员注入点（声明顺序）
    pub fn members(&self) -> &[MemberPoint] {
        &self.members
    }

    /// 类级约束
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// 全部注入点：先参数，后成员
    pub fn injection_points(&self) -> impl Iterator<Item = &InjectionPoint> {
        self.parameters
            .iter()
            .chain(self.members.iter().flat_map(|m| m.points.iter()))
    }

    /// 执行创建阶段
    pub fn create(&self, arguments: &mut Arguments) -> InjectResult<Box<dyn Any + Send>> {
        (self.create)(arguments)
    }

    /// 执行完成阶段
    pub fn finish(&self, stage: Box<dyn Any + Send>) -> InjectResult<Instance> {
        (self.finish)(stage)
    }
}

impl fmt::Debug for ConstructionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionPoint")
            .field("type", &self.type_info)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("parameters", &self.parameters)
            .field("members", &self.members)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

fn stage_mismatch<S>(type_info: &TypeInfo) -> InjectError {
    InjectError::TypeMismatch {
        point: type_info.to_string(),
        expected: std::any::type_name::<S>().to_string(),
    }
}
