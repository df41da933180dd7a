//! # Configuration Abstractions
//!
//! 配置树抽象层，定义节点模型、插件描述和节点访问者接口。
//!
//! ## 核心接口
//!
//! - [`Node`] - 配置树节点
//! - [`PluginEntry`] / [`PluginClass`] / [`PluginType`] - 插件描述
//! - [`NodeVisitor`] - 按注入点来源从节点取值
//! - [`Configurator`] - 把节点树解析为对象

pub mod node;
pub mod plugin;
pub mod visitor;

pub use node::*;
pub use plugin::*;
pub use visitor::*;
