//! # Configuration Implementation
//!
//! 配置树解析所需的具体实现。
//!
//! ## 主要组件
//!
//! - [`PluginCache`] - 插件描述缓存，合并多个描述源
//! - [`PluginRegistry`] - 插件注册表，类名到插件类的映射和节点标注
//! - [`AttributeVisitor`] / [`ElementVisitor`] / [`ValueVisitor`] - 节点访问者

pub mod cache;
pub mod registry;
pub mod visitors;

pub use cache::*;
pub use registry::*;
pub use visitors::*;
