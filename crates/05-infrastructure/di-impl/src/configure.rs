//! 配置树解析
//!
//! 子节点先于父节点解析（插件要求延迟解析子节点时除外），
//! 父节点的子元素注入点从子节点的解析结果中取值。

use crate::injector::{DefaultInjector, InjectorInner};
use config_abstractions::{Configurator, Node};
use di_abstractions::PointSource;
use infrastructure_common::{DiagnosticKind, InjectError, InjectResult, Instance};
use std::sync::Arc;
use tracing::debug;

impl InjectorInner {
    fn configure_node(&self, node: &mut Node, path: &str) -> InjectResult<Option<Instance>> {
        let plugin_type = node
            .plugin_type()
            .cloned()
            .ok_or_else(|| InjectError::MissingPluginType {
                node: path.to_string(),
            })?;

        let defers_children = node.defers_children();
        if !defers_children {
            for child in node.children_mut() {
                let child_path = format!("{path}.{}", child.name());
                if child.plugin_type().is_none() {
                    self.report(
                        DiagnosticKind::SkippedElement,
                        &child_path,
                        format!("子元素 {} 没有对应的插件类型, 已跳过", child.name()),
                    );
                    continue;
                }
                let object = self.configure_node(child, &child_path)?;
                child.set_object(object);
            }
        }

        let point = plugin_type.plugin_class().construction_point();
        debug!(
            plugin = plugin_type.name(),
            class = plugin_type.plugin_class().class_name(),
            path,
            "构建插件"
        );
        match self.construct(&point, Some(&mut *node), path) {
            Ok(instance) => {
                let keeps_node = defers_children
                    || point
                        .injection_points()
                        .any(|p| p.source() == PointSource::Node);
                if self.report_unmatched && !keeps_node {
                    self.report_leftovers(node, path);
                }
                node.set_object(Some(Arc::clone(&instance)));
                Ok(Some(instance))
            }
            Err(error) if error.is_validation() => {
                self.report(DiagnosticKind::ValidationFailure, path, error.to_string());
                node.set_object(None);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// 未被任何注入点消费的属性和子元素
    fn report_leftovers(&self, node: &Node, path: &str) {
        for (name, value) in node.attributes() {
            self.report(
                DiagnosticKind::UnmatchedConfiguration,
                path,
                format!("{} 包含无效的属性 \"{name}\"=\"{value}\"", node.name()),
            );
        }
        for child in node.children().iter().filter(|c| c.plugin_type().is_some()) {
            self.report(
                DiagnosticKind::UnmatchedConfiguration,
                path,
                format!("{} 包含无效的子元素 {child}", node.name()),
            );
        }
    }
}

impl Configurator for DefaultInjector {
    fn configure(&self, node: &mut Node) -> InjectResult<Option<Instance>> {
        let path = node.name().to_string();
        self.inner.configure_node(node, &path)
    }
}
