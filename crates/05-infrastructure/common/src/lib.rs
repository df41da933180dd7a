//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn Wiring 各层共享的基础类型。
//!
//! ## 核心组件
//!
//! - [`Key`] / [`Qualifier`] / [`TypeInfo`] - 绑定标识
//! - [`InjectError`] - 依赖注入错误分类
//! - [`DiagnosticReporter`] - 非致命诊断报告
//! - [`PropertySource`] - 类级约束使用的属性源
//!
//! ## 设计原则
//!
//! - 键按结构比较，名称限定符区分大小写
//! - 结构性错误通过 `Result` 传播，验证失败以诊断形式报告

pub mod diagnostics;
pub mod errors;
pub mod metadata;
pub mod properties;

pub use diagnostics::*;
pub use errors::*;
pub use metadata::*;
pub use properties::*;
