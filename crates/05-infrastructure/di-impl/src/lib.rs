//! # DI Implementation
//!
//! 依赖注入实现：默认注入器、内置作用域、循环依赖检测以及配置树解析。
//!
//! ## 使用示例
//!
//! ```ignore
//! let injector = DefaultInjector::builder()
//!     .with_module(ConfigModule)
//!     .with_scope::<RequestScoped>(RequestScope::new())
//!     .build()?;
//!
//! let service = injector.get::<Service>()?;
//! let appender = injector.configure_as::<Console>(&mut node)?;
//! ```

mod configure;
mod guard;
mod resolution;
mod validation;

pub mod injector;
pub mod scopes;

pub use injector::*;
pub use scopes::*;
