//! 配置树节点
//!
//! 节点由外部解析器创建。解析期间匹配到注入点的属性和子节点会被原地移除，
//! 剩余部分即为未匹配的配置。

use crate::plugin::PluginType;
use indexmap::IndexMap;
use infrastructure_common::Instance;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 配置树节点
#[derive(Clone, Default)]
pub struct Node {
    name: String,
    plugin_type: Option<Arc<PluginType>>,
    attributes: IndexMap<String, String>,
    value: Option<String>,
    children: Vec<Node>,
    object: Option<Instance>,
}

impl Node {
    /// 创建没有插件类型的节点
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 创建带插件类型的节点
    pub fn with_type(name: impl Into<String>, plugin_type: Arc<PluginType>) -> Self {
        Self {
            name: name.into(),
            plugin_type: Some(plugin_type),
            ..Self::default()
        }
    }

    /// 追加属性（构建用）
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// 追加子节点（构建用）
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// 设置文本值（构建用）
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// 节点名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 插件类型
    pub fn plugin_type(&self) -> Option<&Arc<PluginType>> {
        self.plugin_type.as_ref()
    }

    /// 设置插件类型
    pub fn set_plugin_type(&mut self, plugin_type: Option<Arc<PluginType>>) {
        self.plugin_type = plugin_type;
    }

    /// 是否延迟配置子节点
    pub fn defers_children(&self) -> bool {
        self.plugin_type.as_ref().is_some_and(|t| t.is_deferred())
    }

    /// 属性
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// 可变属性
    pub fn attributes_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.attributes
    }

    /// 按名称查找属性（不区分大小写）
    pub fn find_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 按名称移除属性（不区分大小写），保持其余属性的顺序
    pub fn remove_attribute(&mut self, name: &str) -> Option<(String, String)> {
        let index = self
            .attributes
            .keys()
            .position(|k| k.eq_ignore_ascii_case(name))?;
        self.attributes.shift_remove_index(index)
    }

    /// 文本值
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// 设置文本值
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// 子节点
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// 可变子节点
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// 解析结果
    pub fn object(&self) -> Option<&Instance> {
        self.object.as_ref()
    }

    /// 以具体类型读取解析结果
    pub fn object_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.object.clone().and_then(|o| o.downcast::<T>().ok())
    }

    /// 设置解析结果
    pub fn set_object(&mut self, object: Option<Instance>) {
        self.object = object;
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field(
                "plugin_type",
                &self.plugin_type.as_ref().map(|t| t.element_name().to_string()),
            )
            .field("attributes", &self.attributes)
            .field("value", &self.value)
            .field("children", &self.children)
            .field("resolved", &self.object.is_some())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(plugin_type) = &self.plugin_type {
            write!(f, "({})", plugin_type.name())?;
        }
        Ok(())
    }
}
