//! 插件描述缓存
//!
//! 两层映射均为有序映射，按键的字典序迭代和序列化，
//! 因此以任意顺序合并同一批描述得到的输出完全一致。

use config_abstractions::PluginEntry;
use infrastructure_common::{PluginCacheError, PluginCacheResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// 一个类别下的条目：条目键 -> 插件描述
pub type CategoryEntries = BTreeMap<String, PluginEntry>;

/// 插件描述缓存：类别 -> 条目键 -> 插件描述
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginCache {
    categories: BTreeMap<String, CategoryEntries>,
}

impl PluginCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取类别（类别名不区分大小写），首次访问时创建
    pub fn category(&mut self, name: &str) -> &mut CategoryEntries {
        self.categories.entry(name.to_lowercase()).or_default()
    }

    /// 只读获取类别
    pub fn get_category(&self, name: &str) -> Option<&CategoryEntries> {
        self.categories.get(&name.to_lowercase())
    }

    /// 全部类别
    pub fn all_categories(&self) -> &BTreeMap<String, CategoryEntries> {
        &self.categories
    }

    /// 条目总数
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 插入条目，类别取自 `entry.category`
    ///
    /// 同一键已有不同的条目时保留排序较小的一方，结果与插入顺序无关。
    pub fn insert(&mut self, mut entry: PluginEntry) {
        entry.category = entry.category.to_lowercase();
        let category = entry.category.clone();
        let entries = self.category(&category);
        match entries.get(&entry.key) {
            Some(existing) if existing == &entry => {}
            Some(existing) => {
                let keep_existing = entry_order(existing) <= entry_order(&entry);
                warn!(
                    category = %category,
                    key = %entry.key,
                    existing = %existing.class_name,
                    incoming = %entry.class_name,
                    "插件描述冲突, 保留 {}",
                    if keep_existing { &existing.class_name } else { &entry.class_name }
                );
                if !keep_existing {
                    entries.insert(entry.key.clone(), entry);
                }
            }
            None => {
                entries.insert(entry.key.clone(), entry);
            }
        }
    }

    /// 合并另一个缓存
    pub fn merge(&mut self, other: PluginCache) {
        for (category, entries) in other.categories {
            for (key, mut entry) in entries {
                entry.category = category.clone();
                entry.key = key;
                self.insert(entry);
            }
        }
    }

    /// 从 JSON 文本解析，`origin` 用于错误信息
    pub fn from_json_str(json: &str, origin: &str) -> PluginCacheResult<Self> {
        let mut cache: PluginCache =
            serde_json::from_str(json).map_err(|e| PluginCacheError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        cache.normalize();
        Ok(cache)
    }

    /// 从 JSON 文件加载
    pub fn load_json(path: impl AsRef<Path>) -> PluginCacheResult<Self> {
        let path = path.as_ref();
        debug!("加载插件描述文件: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| PluginCacheError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// 加载并合并多个描述文件
    pub fn load_files<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> PluginCacheResult<Self> {
        let mut merged = Self::new();
        let mut files = 0usize;
        for path in paths {
            merged.merge(Self::load_json(path)?);
            files += 1;
        }
        info!(files, entries = merged.len(), "插件描述文件合并完成");
        Ok(merged)
    }

    /// 序列化为 JSON
    pub fn to_json_string(&self) -> PluginCacheResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PluginCacheError::Parse {
            path: "<memory>".to_string(),
            message: e.to_string(),
        })
    }

    /// 写入 JSON 文件
    pub fn write_json(&self, path: impl AsRef<Path>) -> PluginCacheResult<()> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| PluginCacheError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// 反序列化后补全类别字段并统一类别名大小写
    fn normalize(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        for (category, entries) in categories {
            for (key, mut entry) in entries {
                entry.category = category.to_lowercase();
                entry.key = key;
                self.insert(entry);
            }
        }
    }
}

fn entry_order(entry: &PluginEntry) -> (&str, &str, bool, bool) {
    (&entry.class_name, &entry.name, entry.printable, entry.defer)
}

impl fmt::Display for PluginCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (category, entries)) in self.categories.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{category}={{")?;
            for (j, (key, entry)) in entries.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}={entry}")?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}
