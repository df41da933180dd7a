//! 属性源
//!
//! 插件类级约束（例如“要求某属性已设置”）从属性源读取值。

use parking_lot::RwLock;
use std::collections::HashMap;

/// 属性源
pub trait PropertySource: Send + Sync {
    /// 读取属性值
    fn get_property(&self, name: &str) -> Option<String>;

    /// 属性是否已设置
    fn contains_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }
}

/// 从进程环境变量读取属性
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentPropertySource;

impl PropertySource for EnvironmentPropertySource {
    fn get_property(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// 内存属性源
#[derive(Debug, Default)]
pub struct MapPropertySource {
    properties: RwLock<HashMap<String, String>>,
}

impl MapPropertySource {
    /// 创建空属性源
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.write().insert(name.into(), value.into());
    }

    /// 移除属性
    pub fn remove(&self, name: &str) -> Option<String> {
        self.properties.write().remove(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapPropertySource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let properties = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            properties: RwLock::new(properties),
        }
    }
}

impl PropertySource for MapPropertySource {
    fn get_property(&self, name: &str) -> Option<String> {
        self.properties.read().get(name).cloned()
    }
}
