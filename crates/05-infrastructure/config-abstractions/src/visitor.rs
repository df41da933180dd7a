//! 节点访问者
//!
//! 每种注入点来源（属性、子元素、文本值、节点）对应一个访问者，
//! 负责从节点中取出并消费对应的配置。

use crate::node::Node;
use di_abstractions::{Argument, InjectionPoint, StringSubstitutor};
use infrastructure_common::{Diagnostic, DiagnosticKind, DiagnosticReporter, InjectResult, Instance};
use std::any::Any;
use std::sync::Arc;

/// 访问上下文
pub struct VisitContext<'a> {
    path: String,
    substitutor: Option<Arc<StringSubstitutor>>,
    reporter: &'a dyn DiagnosticReporter,
    debug_log: String,
}

impl<'a> VisitContext<'a> {
    /// 创建上下文
    pub fn new(
        path: impl Into<String>,
        substitutor: Option<Arc<StringSubstitutor>>,
        reporter: &'a dyn DiagnosticReporter,
    ) -> Self {
        Self {
            path: path.into(),
            substitutor,
            reporter,
            debug_log: String::new(),
        }
    }

    /// 当前节点路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 替换变量；没有替换器时原样返回
    pub fn substitute(&self, raw: &str) -> String {
        match &self.substitutor {
            Some(substitutor) => substitutor.substitute(raw),
            None => raw.to_string(),
        }
    }

    /// 记录一个参数到调试日志
    pub fn log_param(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.debug_log.is_empty() {
            self.debug_log.push_str(", ");
        }
        self.debug_log.push_str(&format!("{name}=\"{value}\""));
    }

    /// 调试日志
    pub fn debug_log(&self) -> &str {
        &self.debug_log
    }

    /// 报告诊断
    pub fn report(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.reporter
            .report(Diagnostic::new(kind, self.path.clone(), message));
    }

    /// 诊断报告器
    pub fn reporter(&self) -> &'a dyn DiagnosticReporter {
        self.reporter
    }
}

/// 节点访问者
pub trait NodeVisitor: Send + Sync {
    /// 为注入点从节点中取值
    fn visit(
        &self,
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument>;
}

/// 把节点树解析为对象
pub trait Configurator {
    /// 解析节点；验证失败时返回 `Ok(None)` 并报告诊断
    fn configure(&self, node: &mut Node) -> InjectResult<Option<Instance>>;
}

/// [`Configurator`] 的类型化便捷方法
pub trait ConfiguratorExt: Configurator {
    /// 解析节点并转换为具体类型
    fn configure_as<T: Any + Send + Sync>(&self, node: &mut Node) -> InjectResult<Option<Arc<T>>> {
        match self.configure(node)? {
            Some(instance) => di_abstractions::downcast::<T>(instance, node.name()).map(Some),
            None => Ok(None),
        }
    }
}

impl<C: Configurator + ?Sized> ConfiguratorExt for C {}
