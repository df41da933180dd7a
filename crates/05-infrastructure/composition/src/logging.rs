//! 日志初始化

use crate::settings::LoggingSettings;
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 按配置安装全局日志订阅者
///
/// `RUST_LOG` 优先于配置中的级别。已存在全局订阅者时不做任何事并返回 `false`。
pub fn init_logging(settings: &LoggingSettings) -> InfrastructureResult<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| InfrastructureError::Settings {
            message: format!("无效的日志级别 {}: {e}", settings.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let result = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match result {
        Ok(()) => {
            info!(level = %settings.level, json = settings.json, "日志系统初始化完成");
            Ok(true)
        }
        Err(error) => {
            debug!(%error, "已存在全局日志订阅者, 跳过初始化");
            Ok(false)
        }
    }
}
