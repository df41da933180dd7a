//! 注入点与类级约束验证

use di_abstractions::{Argument, Constraint, ConstructionPoint, InjectionPoint};
use infrastructure_common::PropertySource;

/// 类级约束；在解析任何注入点之前检查
pub(crate) fn check_class(
    point: &ConstructionPoint,
    properties: &dyn PropertySource,
    path: &str,
) -> Vec<String> {
    let mut failures = Vec::new();
    for constraint in point.constraints() {
        let Constraint::RequiredProperty { name, value } = constraint else {
            continue;
        };
        match (properties.get_property(name), value) {
            (None, _) => failures.push(format!("{path}: 缺少必需的属性 {name}")),
            (Some(actual), Some(expected)) if &actual != expected => failures.push(format!(
                "{path}: 属性 {name} 的值为 \"{actual}\", 要求为 \"{expected}\""
            )),
            _ => {}
        }
    }
    failures
}

/// 注入点约束；`arguments` 与 `points` 一一对应
pub(crate) fn check_points(
    points: &[InjectionPoint],
    arguments: &[Argument],
    path: &str,
) -> Vec<String> {
    points
        .iter()
        .zip(arguments)
        .flat_map(|(point, argument)| {
            point.constraints().iter().filter_map(move |constraint| match constraint {
                Constraint::Required { message } if argument.is_empty() => Some(match message {
                    Some(message) => format!("{path}.{}: {message}", point.name()),
                    None => format!("{path}.{}: 缺少必需的值", point.name()),
                }),
                _ => None,
            })
        })
        .collect()
}
