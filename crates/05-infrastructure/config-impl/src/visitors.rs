//! 节点访问者实现
//!
//! 属性和元素名称匹配不区分大小写；匹配到的属性和子节点从节点中移除。

use config_abstractions::{Node, NodeVisitor, VisitContext};
use di_abstractions::{Argument, InjectionPoint, PointSource};
use infrastructure_common::{DiagnosticKind, InjectError, InjectResult, Instance};
use std::sync::Arc;
use tracing::debug;

/// 按来源选择访问者；依赖注入点由注入器处理，返回 `None`
pub fn visitor_for(source: PointSource) -> Option<&'static dyn NodeVisitor> {
    match source {
        PointSource::Attribute => Some(&AttributeVisitor),
        PointSource::Element => Some(&ElementVisitor),
        PointSource::Value => Some(&ValueVisitor),
        PointSource::Node => Some(&NodeInjectionVisitor),
        PointSource::Dependency => None,
    }
}

/// 原始字符串经替换、转换后得到参数；转换失败时报告诊断并回退到默认值
fn scalar_argument(
    point: &InjectionPoint,
    raw: Option<String>,
    context: &mut VisitContext<'_>,
) -> Argument {
    if let Some(raw) = raw {
        let substituted = context.substitute(&raw);
        match point.convert(&substituted) {
            Ok(value) => {
                context.log_param(point.name(), &substituted);
                return Argument::Scalar {
                    raw: substituted,
                    value,
                };
            }
            Err(message) => {
                context.report(
                    DiagnosticKind::ConversionFailure,
                    format!("{}: {message}", point.name()),
                );
            }
        }
    }
    default_argument(point, context)
}

fn default_argument(point: &InjectionPoint, context: &mut VisitContext<'_>) -> Argument {
    let Some(default) = point.declared_default() else {
        context.log_param(point.name(), "null");
        return Argument::Absent;
    };
    let substituted = context.substitute(default);
    match point.convert(&substituted) {
        Ok(value) => {
            context.log_param(point.name(), &substituted);
            Argument::Scalar {
                raw: substituted,
                value,
            }
        }
        Err(message) => {
            context.report(
                DiagnosticKind::ConversionFailure,
                format!("{} 的默认值无效: {message}", point.name()),
            );
            Argument::Absent
        }
    }
}

/// 属性访问者
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeVisitor;

impl NodeVisitor for AttributeVisitor {
    fn visit(
        &self,
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        let raw = std::iter::once(point.name())
            .chain(point.aliases().iter().map(String::as_str))
            .find_map(|name| node.remove_attribute(name))
            .map(|(_, value)| value);
        Ok(scalar_argument(point, raw, context))
    }
}

/// 文本值访问者：优先使用节点文本，其次使用同名属性
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueVisitor;

impl NodeVisitor for ValueVisitor {
    fn visit(
        &self,
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        let element_value = node.value().filter(|v| !v.is_empty()).map(str::to_string);
        let attribute_value = node.remove_attribute(point.name()).map(|(_, v)| v);
        if element_value.is_some() && attribute_value.is_some() {
            context.report(
                DiagnosticKind::UnmatchedConfiguration,
                format!("同时设置了文本值和 {} 属性, 使用文本值", point.name()),
            );
        }
        Ok(scalar_argument(point, element_value.or(attribute_value), context))
    }
}

/// 子元素访问者
#[derive(Debug, Default, Clone, Copy)]
pub struct ElementVisitor;

impl ElementVisitor {
    fn matches(point: &InjectionPoint, child: &Node) -> bool {
        child.plugin_type().is_some_and(|plugin_type| {
            point.matches_name(plugin_type.element_name())
                || plugin_type
                    .plugin_class()
                    .is_assignable_to(point.key().type_info())
        })
    }

    fn adapt(point: &InjectionPoint, child: &Node, object: Instance) -> InjectResult<Instance> {
        child
            .plugin_type()
            .and_then(|t| t.plugin_class().adapt(object, point.key().type_info()))
            .ok_or_else(|| InjectError::TypeMismatch {
                point: format!("{} <- {child}", point.name()),
                expected: point.key().type_info().to_string(),
            })
    }

    fn collect_all(
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        let mut values = Vec::new();
        let mut selected = Vec::new();
        let mut index = 0;
        while index < node.children().len() {
            let child = &node.children()[index];
            if !Self::matches(point, child) {
                index += 1;
                continue;
            }
            let Some(object) = child.object().cloned() else {
                context.report(
                    DiagnosticKind::SkippedElement,
                    format!("跳过没有解析结果的子元素 {child}"),
                );
                index += 1;
                continue;
            };
            values.push(Self::adapt(point, child, object)?);
            let child = node.children_mut().remove(index);
            selected.push(child.to_string());
        }
        context.log_param(point.name(), format!("{{{}}}", selected.join(", ")));
        Ok(Argument::Instances(values))
    }

    fn first_match(
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        let Some(index) = node.children().iter().position(|c| Self::matches(point, c)) else {
            context.log_param(point.name(), "null");
            return Ok(Argument::Absent);
        };
        let child = node.children_mut().remove(index);
        context.log_param(point.name(), &child);
        match child.object().cloned() {
            Some(object) => Ok(Argument::Instance(Self::adapt(point, &child, object)?)),
            None => Ok(Argument::Absent),
        }
    }
}

impl NodeVisitor for ElementVisitor {
    fn visit(
        &self,
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        if point.is_multiple() {
            Self::collect_all(point, node, context)
        } else {
            Self::first_match(point, node, context)
        }
    }
}

/// 节点访问者：注入节点本身的副本（保留子节点），用于延迟配置子节点的插件
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeInjectionVisitor;

impl NodeVisitor for NodeInjectionVisitor {
    fn visit(
        &self,
        point: &InjectionPoint,
        node: &mut Node,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        debug!(node = %node, point = point.name(), "注入节点");
        context.log_param(point.name(), &*node);
        Ok(Argument::Instance(Arc::new(node.clone())))
    }
}
