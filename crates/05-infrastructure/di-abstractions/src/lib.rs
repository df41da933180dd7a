//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定、作用域和构造点的核心接口。
//!
//! ## 核心接口
//!
//! - [`Injector`] / [`InjectorExt`] - 注入器接口
//! - [`Scope`] - 作用域策略
//! - [`ConstructionPoint`] / [`Injectable`] - 构造点描述
//! - [`InjectionPoint`] - 注入点描述
//! - [`Module`] / [`ModuleBinder`] - 显式工厂方法
//! - [`Supplier`] - 延迟供应者

pub mod arguments;
pub mod binding;
pub mod construction;
pub mod injection;
pub mod injector;
pub mod module;
pub mod scope;
pub mod substitution;
pub mod supplier;

pub use arguments::*;
pub use binding::*;
pub use construction::*;
pub use injection::*;
pub use injector::*;
pub use module::*;
pub use scope::*;
pub use substitution::*;
pub use supplier::*;
