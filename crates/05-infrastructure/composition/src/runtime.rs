//! 组装完成的运行时

use crate::settings::RuntimeSettings;
use config_abstractions::{Configurator, Node};
use config_impl::PluginRegistry;
use di_abstractions::{downcast, Injectable, InjectorExt};
use di_impl::DefaultInjector;
use infrastructure_common::{InjectResult, Instance};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 运行时：注入器 + 插件注册表
#[derive(Clone)]
pub struct Runtime {
    injector: DefaultInjector,
    registry: Arc<PluginRegistry>,
    settings: RuntimeSettings,
}

impl Runtime {
    pub(crate) fn new(
        injector: DefaultInjector,
        registry: Arc<PluginRegistry>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            injector,
            registry,
            settings,
        }
    }

    /// 注入器
    pub fn injector(&self) -> &DefaultInjector {
        &self.injector
    }

    /// 插件注册表
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// 生效的配置
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// 获取可注入类型的实例
    pub fn get<T: Injectable>(&self) -> InjectResult<Arc<T>> {
        self.injector.get::<T>()
    }

    /// 按类别为节点树标注插件类型后解析
    pub fn configure(&self, category: &str, node: &mut Node) -> InjectResult<Option<Instance>> {
        self.registry.annotate(category, node);
        debug!(category, node = %node, "解析配置树");
        self.injector.configure(node)
    }

    /// [`Runtime::configure`] 并转换为具体类型
    pub fn configure_as<T: Any + Send + Sync>(
        &self,
        category: &str,
        node: &mut Node,
    ) -> InjectResult<Option<Arc<T>>> {
        match self.configure(category, node)? {
            Some(instance) => downcast::<T>(instance, node.name()).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("injector", &self.injector)
            .field("plugins", &self.registry.snapshot().len())
            .field("settings", &self.settings)
            .finish()
    }
}
