//! 已解析的注入参数
//!
//! 构造函数、字段和方法按声明顺序依次取出自己的参数。

use crate::supplier::{DeferredLookup, Supplier};
use infrastructure_common::{InjectError, InjectResult, Instance, Key};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// 把类型擦除的实例还原为具体类型
pub fn downcast<T: Any + Send + Sync>(instance: Instance, point: &str) -> InjectResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| InjectError::TypeMismatch {
            point: point.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}

/// 单个注入点解析出的参数
#[derive(Clone)]
pub enum Argument {
    /// 依赖或子元素实例
    Instance(Instance),
    /// 属性或文本值：原始字符串及转换结果
    Scalar {
        /// 原始字符串（已替换变量）
        raw: String,
        /// 转换后的值
        value: Instance,
    },
    /// 多个子元素
    Instances(Vec<Instance>),
    /// 延迟供应者
    Deferred(DeferredLookup),
    /// 没有值
    Absent,
}

impl Argument {
    /// 是否缺失
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// 是否为空：缺失、空字符串或空集合
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Scalar { raw, .. } => raw.is_empty(),
            Self::Instances(values) => values.is_empty(),
            Self::Instance(instance) => instance
                .downcast_ref::<String>()
                .is_some_and(String::is_empty),
            Self::Deferred(_) => false,
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Scalar { raw, .. } => f.debug_struct("Scalar").field("raw", raw).finish(),
            Self::Instances(values) => write!(f, "Instances(len={})", values.len()),
            Self::Deferred(lookup) => f.debug_tuple("Deferred").field(lookup.key()).finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// 参数条目
#[derive(Debug, Clone)]
pub struct ArgumentEntry {
    /// 注入点名称
    pub point: String,
    /// 注入点目标键
    pub key: Key,
    /// 参数值
    pub argument: Argument,
}

/// 按声明顺序排列的参数队列
#[derive(Debug, Default)]
pub struct Arguments {
    owner: String,
    entries: VecDeque<ArgumentEntry>,
}

impl Arguments {
    /// 创建空参数队列，`owner` 用于错误信息
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: VecDeque::new(),
        }
    }

    /// 追加参数
    pub fn push(&mut self, point: impl Into<String>, key: Key, argument: Argument) {
        self.entries.push_back(ArgumentEntry {
            point: point.into(),
            key,
            argument,
        });
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// 下一个参数是否缺失
    pub fn next_is_absent(&self) -> bool {
        self.entries.front().map_or(true, |e| e.argument.is_absent())
    }

    fn next(&mut self) -> InjectResult<ArgumentEntry> {
        self.entries.pop_front().ok_or_else(|| InjectError::MissingValue {
            point: format!("{}#<参数已耗尽>", self.owner),
        })
    }

    fn point_path(&self, entry: &ArgumentEntry) -> String {
        format!("{}.{}", self.owner, entry.point)
    }

    /// 跳过下一个参数
    pub fn skip(&mut self) -> InjectResult<()> {
        self.next().map(|_| ())
    }

    /// 取出必需的实例
    pub fn instance<T: Any + Send + Sync>(&mut self) -> InjectResult<Arc<T>> {
        let entry = self.next()?;
        let path = self.point_path(&entry);
        match entry.argument {
            Argument::Instance(instance) | Argument::Scalar { value: instance, .. } => {
                downcast::<T>(instance, &path)
            }
            Argument::Instances(mut values) if values.len() == 1 => {
                downcast::<T>(values.remove(0), &path)
            }
            Argument::Deferred(lookup) => Supplier::<T>::new(lookup).get(),
            _ => Err(InjectError::MissingValue { point: path }),
        }
    }

    /// 取出可选的实例
    pub fn optional<T: Any + Send + Sync>(&mut self) -> InjectResult<Option<Arc<T>>> {
        if self.next_is_absent() {
            self.skip()?;
            return Ok(None);
        }
        self.instance::<T>().map(Some)
    }

    /// 取出必需的值（克隆）
    pub fn value<T: Any + Send + Sync + Clone>(&mut self) -> InjectResult<T> {
        self.instance::<T>().map(|value| (*value).clone())
    }

    /// 取出可选的值（克隆）
    pub fn optional_value<T: Any + Send + Sync + Clone>(&mut self) -> InjectResult<Option<T>> {
        Ok(self.optional::<T>()?.map(|value| (*value).clone()))
    }

    /// 取出全部元素；缺失时为空
    pub fn all<T: Any + Send + Sync>(&mut self) -> InjectResult<Vec<Arc<T>>> {
        let entry = self.next()?;
        let path = self.point_path(&entry);
        match entry.argument {
            Argument::Instances(values) => values
                .into_iter()
                .map(|instance| downcast::<T>(instance, &path))
                .collect(),
            Argument::Instance(instance) | Argument::Scalar { value: instance, .. } => {
                Ok(vec![downcast::<T>(instance, &path)?])
            }
            Argument::Absent => Ok(Vec::new()),
            Argument::Deferred(_) => Err(InjectError::TypeMismatch {
                point: path,
                expected: std::any::type_name::<Vec<Arc<T>>>().to_string(),
            }),
        }
    }

    /// 取出全部元素的值（克隆）
    pub fn all_values<T: Any + Send + Sync + Clone>(&mut self) -> InjectResult<Vec<T>> {
        Ok(self
            .all::<T>()?
            .into_iter()
            .map(|value| (*value).clone())
            .collect())
    }

    /// 取出延迟供应者
    pub fn supplier<T: Any + Send + Sync>(&mut self) -> InjectResult<Supplier<T>> {
        let entry = self.next()?;
        let path = self.point_path(&entry);
        match entry.argument {
            Argument::Deferred(lookup) => Ok(Supplier::new(lookup)),
            Argument::Instance(instance) => {
                let factory: crate::scope::Factory = Arc::new(move || Ok(Arc::clone(&instance)));
                Ok(Supplier::new(DeferredLookup::resolved(entry.key, factory)))
            }
            _ => Err(InjectError::MissingValue { point: path }),
        }
    }
}
