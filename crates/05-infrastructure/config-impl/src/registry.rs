//! 插件注册表
//!
//! 合并后的描述缓存只包含类名；注册表把类名对应到已登记的 [`PluginClass`]，
//! 并为配置树节点查找插件类型。

use crate::cache::PluginCache;
use config_abstractions::{Node, PluginClass, PluginEntry, PluginType};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// 插件注册表
#[derive(Debug, Default)]
pub struct PluginRegistry {
    classes: DashMap<String, PluginClass>,
    cache: RwLock<PluginCache>,
    resolved: DashMap<(String, String), Arc<PluginType>>,
}

impl PluginRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记插件类（按类名）
    pub fn register_class(&self, class: PluginClass) {
        debug!(class = class.class_name(), "登记插件类");
        self.classes.insert(class.class_name().to_string(), class);
        self.resolved.clear();
    }

    /// 登记插件类并写入描述条目
    pub fn register_plugin(&self, category: &str, name: &str, class: PluginClass) {
        let entry = PluginEntry::new(name, class.class_name(), category);
        self.register_class(class);
        self.cache.write().insert(entry);
    }

    /// 合并描述缓存
    pub fn merge_cache(&self, cache: PluginCache) {
        let count = cache.len();
        self.cache.write().merge(cache);
        self.resolved.clear();
        info!(entries = count, "插件描述已合并到注册表");
    }

    /// 按类别和条目键查找插件类型（均不区分大小写）
    ///
    /// 没有描述条目或类名未登记时返回 `None`。
    pub fn plugin_type(&self, category: &str, key: &str) -> Option<Arc<PluginType>> {
        let lookup = (category.to_lowercase(), key.to_lowercase());
        if let Some(found) = self.resolved.get(&lookup) {
            return Some(Arc::clone(found.value()));
        }

        let entry = self
            .cache
            .read()
            .get_category(&lookup.0)
            .and_then(|entries| entries.get(&lookup.1))
            .cloned()?;
        let Some(class) = self.classes.get(&entry.class_name).map(|c| c.value().clone()) else {
            debug!(class = %entry.class_name, key = %entry.key, "插件类未登记");
            return None;
        };
        let plugin_type = Arc::new(PluginType::new(entry, class));
        self.resolved.insert(lookup, Arc::clone(&plugin_type));
        Some(plugin_type)
    }

    /// 类别下全部可解析的插件类型（按条目键排序）
    pub fn category_plugins(&self, category: &str) -> Vec<Arc<PluginType>> {
        let keys: Vec<String> = self
            .cache
            .read()
            .get_category(category)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.iter()
            .filter_map(|key| self.plugin_type(category, key))
            .collect()
    }

    /// 按节点名称为节点树标注插件类型；已有类型的节点保持不变
    pub fn annotate(&self, category: &str, node: &mut Node) {
        if node.plugin_type().is_none() {
            node.set_plugin_type(self.plugin_type(category, node.name()));
        }
        for child in node.children_mut() {
            self.annotate(category, child);
        }
    }

    /// 当前描述缓存的快照
    pub fn snapshot(&self) -> PluginCache {
        self.cache.read().clone()
    }
}
