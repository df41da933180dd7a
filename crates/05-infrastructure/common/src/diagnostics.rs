//! 诊断报告
//!
//! 验证失败和未匹配配置不会中断解析，而是通过 [`DiagnosticReporter`] 报告。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use tracing::{error, warn};

/// 诊断种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// 约束验证失败，节点解析结果为空
    ValidationFailure,
    /// 未被任何注入点消费的属性或子节点
    UnmatchedConfiguration,
    /// 因缺少插件类型等原因被跳过的子节点
    SkippedElement,
    /// 标量转换失败，回退到默认值
    ConversionFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ValidationFailure => "验证失败",
            Self::UnmatchedConfiguration => "未匹配配置",
            Self::SkippedElement => "跳过元素",
            Self::ConversionFailure => "转换失败",
        };
        f.write_str(label)
    }
}

/// 单条诊断记录
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// 诊断种类
    pub kind: DiagnosticKind,
    /// 节点路径，例如 `Configuration.Appenders.Console`
    pub path: String,
    /// 描述信息
    pub message: String,
    /// 报告时间
    pub reported_at: DateTime<Utc>,
}

impl Diagnostic {
    /// 创建诊断记录
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
            reported_at: Utc::now(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path, self.message)
    }
}

/// 诊断报告器
pub trait DiagnosticReporter: Send + Sync {
    /// 报告一条诊断
    fn report(&self, diagnostic: Diagnostic);
}

/// 通过 tracing 输出诊断（默认报告器）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl DiagnosticReporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::ValidationFailure => {
                error!(path = %diagnostic.path, "{}", diagnostic.message);
            }
            _ => {
                warn!(path = %diagnostic.path, kind = %diagnostic.kind, "{}", diagnostic.message);
            }
        }
    }
}

/// 收集诊断记录，供嵌入方或测试检查
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    /// 创建空的收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收集的全部诊断
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// 指定种类的诊断
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// 清空
    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        TracingReporter.report(diagnostic.clone());
        self.diagnostics.lock().push(diagnostic);
    }
}
