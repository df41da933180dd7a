//! 元数据定义
//!
//! 提供类型描述、限定符和绑定键

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 类型擦除后的组件实例
///
/// 单例作用域依赖 `Arc` 的指针相等性判断“同一实例”。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 类型信息
///
/// 相等性与哈希只比较 [`TypeId`]，名称仅用于诊断输出。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    id: TypeId,
    /// 完整类型路径
    module_path: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            module_path: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称（包含模块路径）
    pub fn full_name(&self) -> &'static str {
        self.module_path
    }

    /// 获取简短的类型名称（去掉所有模块路径，保留泛型结构）
    pub fn short_name(&self) -> String {
        short_type_name(self.module_path)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// `alloc::sync::Arc<dyn app::Appender>` -> `Arc<dyn Appender>`
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut word = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            word.push(ch);
        } else {
            flush_segment(&mut out, &mut word);
            out.push(ch);
        }
    }
    flush_segment(&mut out, &mut word);
    out
}

fn flush_segment(out: &mut String, word: &mut String) {
    if let Some(last) = word.rsplit("::").next() {
        out.push_str(last);
    }
    word.clear();
}

/// 限定符
///
/// 名称限定符按字面值区分大小写比较；种类限定符只比较标记类型本身。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// 名称限定符
    Named(String),
    /// 限定符种类（由标记类型表示）
    Kind(TypeInfo),
}

impl Qualifier {
    /// 创建名称限定符
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// 创建限定符种类
    pub fn kind<Q: ?Sized + 'static>() -> Self {
        Self::Kind(TypeInfo::of::<Q>())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "@Named(\"{name}\")"),
            Self::Kind(kind) => write!(f, "@{kind}"),
        }
    }
}

/// 绑定键：类型 + 可选限定符
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    type_info: TypeInfo,
    qualifier: Option<Qualifier>,
}

impl Key {
    /// 无限定符的键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_type(TypeInfo::of::<T>())
    }

    /// 带名称限定符的键
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::of::<T>().with_qualifier(Some(Qualifier::named(name)))
    }

    /// 带限定符种类的键
    pub fn qualified<T: ?Sized + 'static, Q: ?Sized + 'static>() -> Self {
        Self::of::<T>().with_qualifier(Some(Qualifier::kind::<Q>()))
    }

    /// 从类型信息创建
    pub fn from_type(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            qualifier: None,
        }
    }

    /// 替换限定符
    pub fn with_qualifier(mut self, qualifier: Option<Qualifier>) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// 同类型、以给定名称限定的键（用于别名查找）
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            type_info: self.type_info,
            qualifier: Some(Qualifier::named(name)),
        }
    }

    /// 类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// 名称限定符的名称
    pub fn name(&self) -> Option<&str> {
        match &self.qualifier {
            Some(Qualifier::Named(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{qualifier} {}", self.type_info),
            None => write!(f, "{}", self.type_info),
        }
    }
}
