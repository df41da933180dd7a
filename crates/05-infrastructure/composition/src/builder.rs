//! 运行时构建器

use crate::logging::init_logging;
use crate::runtime::Runtime;
use crate::settings::{RuntimeSettings, SettingsLoader};
use config_abstractions::PluginClass;
use config_impl::{PluginCache, PluginRegistry};
use di_abstractions::{InjectorExt, Module, Scope};
use di_impl::{DefaultInjector, DefaultInjectorBuilder};
use infrastructure_common::{
    DiagnosticReporter, InfrastructureResult, Key, PropertySource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 运行时构建器
///
/// 使用建造者模式组装配置、插件注册表和注入器。
pub struct RuntimeBuilder {
    /// 直接提供的配置，优先于配置文件
    settings: Option<RuntimeSettings>,
    /// 配置加载器
    loader: SettingsLoader,
    /// 注入器构建器
    injector: DefaultInjectorBuilder,
    /// 插件注册表
    registry: PluginRegistry,
    /// 是否初始化日志
    logging_enabled: bool,
}

impl RuntimeBuilder {
    /// 创建新的运行时构建器
    pub fn new() -> Self {
        Self {
            settings: None,
            loader: SettingsLoader::new(),
            injector: DefaultInjector::builder(),
            registry: PluginRegistry::new(),
            logging_enabled: false,
        }
    }

    /// 直接使用给定配置，不再读取文件和环境变量
    pub fn with_settings(mut self, settings: RuntimeSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 从 TOML 文件加载配置
    pub fn with_settings_file(mut self, path: impl AsRef<Path>) -> Self {
        info!("使用运行时配置文件: {}", path.as_ref().display());
        self.loader = self.loader.with_file(path);
        self
    }

    /// 环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.loader = self.loader.with_env_prefix(prefix);
        self
    }

    /// 安装模块
    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        debug!(module = module.name(), "添加模块");
        self.injector = self.injector.with_module(module);
        self
    }

    /// 注册作用域
    pub fn with_scope<M: ?Sized + 'static>(mut self, scope: impl Scope + 'static) -> Self {
        self.injector = self.injector.with_scope::<M>(scope);
        self
    }

    /// 类级约束使用的属性源
    pub fn with_properties(mut self, properties: Arc<dyn PropertySource>) -> Self {
        self.injector = self.injector.with_properties(properties);
        self
    }

    /// 诊断报告器
    pub fn with_reporter(mut self, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        self.injector = self.injector.with_reporter(reporter);
        self
    }

    /// 登记插件类；描述条目来自描述文件
    pub fn register_class(self, class: PluginClass) -> Self {
        self.registry.register_class(class);
        self
    }

    /// 登记插件类并写入描述条目
    pub fn register_plugin(self, category: &str, name: &str, class: PluginClass) -> Self {
        self.registry.register_plugin(category, name, class);
        self
    }

    /// 合并内存中的描述缓存
    pub fn with_descriptors(self, cache: PluginCache) -> Self {
        self.registry.merge_cache(cache);
        self
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 构建运行时
    pub fn build(self) -> InfrastructureResult<Runtime> {
        let settings = match self.settings {
            Some(settings) => settings,
            None => self.loader.load()?,
        };

        if self.logging_enabled {
            init_logging(&settings.logging)?;
        }
        info!("开始构建运行时");

        let sources: Vec<PathBuf> = settings.descriptor_sources.clone();
        if !sources.is_empty() {
            self.registry.merge_cache(PluginCache::load_files(&sources)?);
        }
        let registry = Arc::new(self.registry);

        let injector = self
            .injector
            .report_unmatched(settings.report_unmatched)
            .build()?;
        injector.bind_instance(Key::of::<Arc<PluginRegistry>>(), Arc::clone(&registry))?;

        info!(
            descriptor_sources = sources.len(),
            plugins = registry.snapshot().len(),
            bindings = injector.binding_count(),
            "运行时构建完成"
        );
        Ok(Runtime::new(injector, registry, settings))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
