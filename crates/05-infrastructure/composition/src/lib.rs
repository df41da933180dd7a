//! # 基础设施组合层
//!
//! 把插件注册表、注入器、运行时配置和日志组合成一个可用的运行时。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use config_abstractions::Node;
//! use infrastructure_composition::RuntimeBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = RuntimeBuilder::new()
//!         .with_settings_file("wiring.toml")
//!         .with_logging(true)
//!         .build()?;
//!
//!     let mut root = Node::new("Console").attribute("name", "stdout");
//!     let appender = runtime.configure("core", &mut root)?;
//!     println!("解析结果: {}", appender.is_some());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod logging;
pub mod runtime;
pub mod settings;

#[cfg(test)]
mod tests;

pub use builder::RuntimeBuilder;
pub use logging::init_logging;
pub use runtime::Runtime;
pub use settings::{LoggingSettings, RuntimeSettings, SettingsLoader};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
