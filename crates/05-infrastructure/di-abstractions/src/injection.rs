//! 注入点定义
//!
//! 注入点描述构造函数参数、字段或方法参数从哪里取值：
//! 注入器绑定、节点属性、子元素、节点文本值或节点本身。

use crate::construction::{ConstructionFn, Injectable};
use infrastructure_common::{Instance, Key, Qualifier};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 标量转换函数：原始字符串 -> 类型擦除后的值
pub type Converter = Arc<dyn Fn(&str) -> Result<Instance, String> + Send + Sync>;

/// 注入点取值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointSource {
    /// 注入器中的绑定
    Dependency,
    /// 节点属性
    Attribute,
    /// 子元素（已解析的子节点对象）
    Element,
    /// 节点文本值
    Value,
    /// 节点本身
    Node,
}

impl fmt::Display for PointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dependency => "dependency",
            Self::Attribute => "attribute",
            Self::Element => "element",
            Self::Value => "value",
            Self::Node => "node",
        };
        f.write_str(label)
    }
}

/// 验证约束
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// 值不能缺失或为空
    Required {
        /// 自定义失败信息
        message: Option<String>,
    },
    /// 类级约束：属性源中必须存在指定属性（可选地要求等于指定值）
    RequiredProperty {
        /// 属性名
        name: String,
        /// 期望值
        value: Option<String>,
    },
}

impl Constraint {
    /// 必需约束
    pub fn required() -> Self {
        Self::Required { message: None }
    }

    /// 属性约束
    pub fn required_property(name: impl Into<String>) -> Self {
        Self::RequiredProperty {
            name: name.into(),
            value: None,
        }
    }

    /// 要求属性等于指定值
    pub fn required_property_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::RequiredProperty {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// 注入点
#[derive(Clone)]
pub struct InjectionPoint {
    name: String,
    key: Key,
    source: PointSource,
    aliases: Vec<String>,
    deferred: bool,
    multiple: bool,
    constraints: Vec<Constraint>,
    default_value: Option<String>,
    converter: Option<Converter>,
    construction: Option<ConstructionFn>,
}

impl InjectionPoint {
    fn new(name: impl Into<String>, key: Key, source: PointSource) -> Self {
        Self {
            name: name.into(),
            key,
            source,
            aliases: Vec::new(),
            deferred: false,
            multiple: false,
            constraints: Vec::new(),
            default_value: None,
            converter: None,
            construction: None,
        }
    }

    /// 依赖注入点：从注入器绑定取值
    pub fn dependency<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self::new(name, Key::of::<T>(), PointSource::Dependency)
    }

    /// 依赖注入点，无绑定时使用类型自身的构造点
    pub fn injectable<T: Injectable>(name: impl Into<String>) -> Self {
        let mut point = Self::dependency::<T>(name);
        point.construction = Some(T::construction_point);
        point
    }

    /// 属性注入点：从节点属性取值并通过 [`FromStr`] 转换
    pub fn attribute<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: fmt::Display,
    {
        let mut point = Self::new(name, Key::of::<T>(), PointSource::Attribute);
        point.converter = Some(parse_converter::<T>());
        point
    }

    /// 文本值注入点
    pub fn value<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: fmt::Display,
    {
        let mut point = Self::new(name, Key::of::<T>(), PointSource::Value);
        point.converter = Some(parse_converter::<T>());
        point
    }

    /// 单个子元素注入点，`T` 为期望的元素类型
    pub fn element<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self::new(name, Key::of::<T>(), PointSource::Element)
    }

    /// 多个子元素注入点，按声明顺序收集所有匹配的子元素
    pub fn elements<T: Any + Send + Sync>(name: impl Into<String>) -> Self {
        let mut point = Self::element::<T>(name);
        point.multiple = true;
        point
    }

    /// 节点注入点，`N` 为节点类型
    pub fn node<N: Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self::new(name, Key::of::<N>(), PointSource::Node)
    }

    /// 名称限定符（区分大小写）
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.key = self.key.with_qualifier(Some(Qualifier::named(name)));
        self
    }

    /// 限定符种类
    pub fn qualified<Q: ?Sized + 'static>(mut self) -> Self {
        self.key = self.key.with_qualifier(Some(Qualifier::kind::<Q>()));
        self
    }

    /// 别名：依赖注入点按顺序尝试同类型的其他名称，
    /// 属性/元素注入点接受其他属性名或元素名
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// 请求延迟供应者而不是立即解析的值
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// 必需约束
    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::required());
        self
    }

    /// 带自定义信息的必需约束
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Required {
            message: Some(message.into()),
        });
        self
    }

    /// 默认值（与属性值一样经过转换）
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// 注入点名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 目标键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 取值来源
    pub fn source(&self) -> PointSource {
        self.source
    }

    /// 别名
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// 名称或任一别名与给定名称相同（不区分大小写）
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.name.eq_ignore_ascii_case(candidate)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(candidate))
    }

    /// 是否延迟
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// 是否收集多个元素
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// 约束列表
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// 是否必需
    pub fn is_required(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, Constraint::Required { .. }))
    }

    /// 默认值
    pub fn declared_default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// 类型自身的构造点
    pub fn construction(&self) -> Option<ConstructionFn> {
        self.construction
    }

    /// 转换原始字符串
    pub fn convert(&self, raw: &str) -> Result<Instance, String> {
        match &self.converter {
            Some(converter) => converter(raw),
            None => Ok(Arc::new(raw.to_string())),
        }
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("source", &self.source)
            .field("aliases", &self.aliases)
            .field("deferred", &self.deferred)
            .field("multiple", &self.multiple)
            .field("constraints", &self.constraints)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

fn parse_converter<T>() -> Converter
where
    T: FromStr + Any + Send + Sync,
    T::Err: fmt::Display,
{
    Arc::new(|raw: &str| {
        raw.parse::<T>()
            .map(|value| Arc::new(value) as Instance)
            .map_err(|e| format!("无法将 \"{raw}\" 转换为 {}: {e}", std::any::type_name::<T>()))
    })
}
