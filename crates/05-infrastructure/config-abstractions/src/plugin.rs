//! 插件描述
//!
//! [`PluginEntry`] 是描述文件中的一条记录；[`PluginClass`] 把记录中的类名
//! 对应到 Rust 类型；两者合起来构成节点使用的 [`PluginType`]。

use di_abstractions::{ConstructionFn, ConstructionPoint, Injectable};
use infrastructure_common::{Instance, TypeInfo};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 插件描述记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginEntry {
    /// 条目键（小写的插件名）
    pub key: String,
    /// 实现类名
    pub class_name: String,
    /// 声明的插件名
    pub name: String,
    /// 是否可打印
    #[serde(default)]
    pub printable: bool,
    /// 是否延迟配置子节点
    #[serde(default)]
    pub defer: bool,
    /// 所属类别（由外层映射决定，不序列化）
    #[serde(skip)]
    pub category: String,
}

impl PluginEntry {
    /// 创建记录，键为小写的名称
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            key: name.to_lowercase(),
            class_name: class_name.into(),
            name,
            printable: false,
            defer: false,
            category: category.into(),
        }
    }

    /// 设置可打印标志
    pub fn printable(mut self, printable: bool) -> Self {
        self.printable = printable;
        self
    }

    /// 设置延迟子节点标志
    pub fn defer_children(mut self, defer: bool) -> Self {
        self.defer = defer;
        self
    }
}

impl fmt::Display for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PluginEntry [key={}, className={}, name={}, printable={}, defer={}, category={}]",
            self.key, self.class_name, self.name, self.printable, self.defer, self.category
        )
    }
}

/// 向上转换函数：具体实例 -> 目标类型实例
pub type UpcastFn = Arc<dyn Fn(Instance) -> Option<Instance> + Send + Sync>;

/// 插件类：类名到 Rust 类型的映射
#[derive(Clone)]
pub struct PluginClass {
    type_info: TypeInfo,
    class_name: String,
    element_type: Option<String>,
    construction: ConstructionFn,
    upcasts: Vec<(TypeInfo, UpcastFn)>,
}

impl PluginClass {
    /// 以类型路径作为类名
    pub fn of<T: Injectable>() -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            type_info,
            class_name: type_info.full_name().to_string(),
            element_type: None,
            construction: T::construction_point,
            upcasts: Vec::new(),
        }
    }

    /// 指定描述文件中使用的类名
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// 元素类型名（为空时使用插件名）
    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// 声明可赋值给 `Arc<U>`，例如 `|c: Arc<Console>| c as Arc<dyn Appender>`
    pub fn implements<T, U, F>(mut self, cast: F) -> Self
    where
        T: Any + Send + Sync,
        U: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<U> + Send + Sync + 'static,
    {
        let upcast: UpcastFn = Arc::new(move |instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|value| Arc::new(cast(value)) as Instance)
        });
        self.upcasts.push((TypeInfo::of::<Arc<U>>(), upcast));
        self
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 类名
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// 元素类型名
    pub fn element_type(&self) -> Option<&str> {
        self.element_type.as_deref()
    }

    /// 是否可赋值给目标类型
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.type_info == *target || self.upcasts.iter().any(|(t, _)| t == target)
    }

    /// 把实例转换为目标类型
    pub fn adapt(&self, instance: Instance, target: &TypeInfo) -> Option<Instance> {
        if self.type_info == *target {
            return Some(instance);
        }
        self.upcasts
            .iter()
            .find(|(t, _)| t == target)
            .and_then(|(_, upcast)| upcast(instance))
    }

    /// 构造点
    pub fn construction_point(&self) -> ConstructionPoint {
        (self.construction)()
    }

    /// 构造点函数
    pub fn construction(&self) -> ConstructionFn {
        self.construction
    }
}

impl fmt::Debug for PluginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginClass")
            .field("type", &self.type_info)
            .field("class_name", &self.class_name)
            .field("element_type", &self.element_type)
            .field(
                "implements",
                &self.upcasts.iter().map(|(t, _)| t.to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 插件类型：描述记录 + 插件类
#[derive(Debug, Clone)]
pub struct PluginType {
    entry: PluginEntry,
    class: PluginClass,
    element_name: String,
}

impl PluginType {
    /// 组合描述记录与插件类
    pub fn new(entry: PluginEntry, class: PluginClass) -> Self {
        let element_name = class
            .element_type()
            .filter(|e| !e.is_empty())
            .map_or_else(|| entry.name.clone(), str::to_string);
        Self {
            entry,
            class,
            element_name,
        }
    }

    /// 直接从插件类创建，条目键为小写的插件名
    pub fn from_class(name: &str, category: &str, class: PluginClass) -> Self {
        let entry = PluginEntry::new(name, class.class_name(), category);
        Self::new(entry, class)
    }

    /// 描述记录
    pub fn entry(&self) -> &PluginEntry {
        &self.entry
    }

    /// 插件类
    pub fn plugin_class(&self) -> &PluginClass {
        &self.class
    }

    /// 元素名
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// 插件名
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// 类别
    pub fn category(&self) -> &str {
        &self.entry.category
    }

    /// 是否延迟配置子节点
    pub fn is_deferred(&self) -> bool {
        self.entry.defer
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PluginType [class={}, key={}, elementName={}, category={}]",
            self.class.class_name(),
            self.entry.key,
            self.element_name,
            self.entry.category
        )
    }
}
