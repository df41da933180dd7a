//! 构造点解析
//!
//! 顺序：类级约束、构造参数、成员注入点、注入点约束，全部通过后才创建实例，
//! 然后按声明顺序执行成员注入，最后完成构建。

use crate::injector::InjectorInner;
use crate::validation;
use config_abstractions::{Node, VisitContext};
use config_impl::visitor_for;
use di_abstractions::{
    Argument, Arguments, ConstructionPoint, DeferredLookup, Factory, InjectionPoint, LookupFn,
};
use infrastructure_common::{InjectError, InjectResult, Instance};
use std::sync::Arc;
use tracing::debug;

impl InjectorInner {
    /// 依赖注入点的工厂：先查绑定（主键、别名键），再查构造点
    ///
    /// 带限定符且无法构造时返回 `None`，由必需约束决定是否失败。
    pub(crate) fn dependency_factory(&self, point: &InjectionPoint) -> InjectResult<Option<Factory>> {
        let key = point.key();
        let candidates = std::iter::once(key.clone())
            .chain(point.aliases().iter().map(|alias| key.with_name(alias.as_str())));
        for candidate in candidates {
            if let Some(factory) = self.bound_factory(&candidate) {
                return Ok(Some(factory));
            }
        }

        let construction = point
            .construction()
            .or_else(|| self.registered_construction(key.type_info()));
        match construction {
            Some(construction) => self.implicit_factory(key, construction).map(Some),
            None if key.qualifier().is_some() => Ok(None),
            None => Err(InjectError::NoConstructionPoint { key: key.clone() }),
        }
    }

    fn resolve_dependency(
        &self,
        point: &InjectionPoint,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Argument> {
        if point.is_deferred() {
            let self_ref = self.self_ref.clone();
            let target = point.clone();
            let lookup: LookupFn = Arc::new(move || {
                let inner = self_ref.upgrade().ok_or_else(|| InjectError::InjectorDropped {
                    key: target.key().clone(),
                })?;
                inner
                    .dependency_factory(&target)?
                    .ok_or_else(|| InjectError::NoConstructionPoint {
                        key: target.key().clone(),
                    })
            });
            context.log_param(point.name(), format!("Supplier<{}>", point.key()));
            return Ok(Argument::Deferred(DeferredLookup::new(
                point.key().clone(),
                lookup,
            )));
        }

        let Some(factory) = self.dependency_factory(point)? else {
            context.log_param(point.name(), "null");
            return Ok(Argument::Absent);
        };
        let instance = factory()?;
        context.log_param(point.name(), point.key());
        Ok(Argument::Instance(instance))
    }

    fn resolve_points(
        &self,
        points: &[InjectionPoint],
        mut node: Option<&mut Node>,
        context: &mut VisitContext<'_>,
    ) -> InjectResult<Vec<Argument>> {
        let mut arguments = Vec::with_capacity(points.len());
        for point in points {
            let argument = match visitor_for(point.source()) {
                None => self.resolve_dependency(point, context)?,
                Some(visitor) => match node.as_deref_mut() {
                    Some(node) => visitor.visit(point, node, context)?,
                    // 不经过配置树时按空节点处理，属性取默认值
                    None => visitor.visit(point, &mut Node::default(), context)?,
                },
            };
            arguments.push(argument);
        }
        Ok(arguments)
    }

    /// 按构造点创建实例；`node` 为配置树中的当前节点
    pub(crate) fn construct(
        &self,
        point: &ConstructionPoint,
        mut node: Option<&mut Node>,
        path: &str,
    ) -> InjectResult<Instance> {
        let class_failures = validation::check_class(point, self.properties.as_ref(), path);
        if !class_failures.is_empty() {
            return Err(InjectError::Validation {
                target: path.to_string(),
                failures: class_failures,
            });
        }

        let mut context = VisitContext::new(path, self.substitutor(), self.reporter.as_ref());
        let parameters = self.resolve_points(point.parameters(), node.as_deref_mut(), &mut context)?;
        let mut members = Vec::with_capacity(point.members().len());
        for member in point.members() {
            members.push(self.resolve_points(member.points(), node.as_deref_mut(), &mut context)?);
        }

        let mut failures = validation::check_points(point.parameters(), &parameters, path);
        for (member, arguments) in point.members().iter().zip(&members) {
            failures.extend(validation::check_points(member.points(), arguments, path));
        }
        if !failures.is_empty() {
            return Err(InjectError::Validation {
                target: path.to_string(),
                failures,
            });
        }

        debug!(
            target_type = %point.type_info(),
            kind = ?point.kind(),
            path,
            "构建实例, 参数: {}",
            context.debug_log()
        );

        let owner = point.type_info().short_name();
        let mut arguments = queue(&owner, point.parameters(), parameters);
        let mut stage = point.create(&mut arguments)?;
        for (member, values) in point.members().iter().zip(members) {
            let mut arguments = queue(&format!("{owner}.{}", member.name()), member.points(), values);
            member.apply(stage.as_mut(), &mut arguments)?;
        }
        point.finish(stage)
    }
}

fn queue(owner: &str, points: &[InjectionPoint], values: Vec<Argument>) -> Arguments {
    let mut arguments = Arguments::new(owner);
    for (point, value) in points.iter().zip(values) {
        arguments.push(point.name(), point.key().clone(), value);
    }
    arguments
}
