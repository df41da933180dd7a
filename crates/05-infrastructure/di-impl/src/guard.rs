//! 循环依赖检测
//!
//! 两道检查：生成隐式工厂前沿构造点的非延迟依赖遍历构造图；
//! 调用工厂时每个线程维护一个"正在解析"的键栈，进入工厂前压栈，离开时出栈，
//! 栈中已存在同一个键说明出现了循环。前者在任何单例缓存单元被占用前失败，
//! 后者覆盖经由显式绑定工厂形成的循环。

use crate::injector::InjectorInner;
use di_abstractions::{ConstructionFn, Factory, InjectionPoint, PointSource};
use infrastructure_common::{InjectError, InjectResult, Key};
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

thread_local! {
    static IN_PROGRESS: RefCell<Vec<Key>> = const { RefCell::new(Vec::new()) };
}

/// 解析守卫，析构时出栈
#[derive(Debug)]
pub(crate) struct ResolutionGuard {
    depth: usize,
}

impl ResolutionGuard {
    /// 进入键的解析；键已在栈中时返回包含完整链路的循环依赖错误
    pub(crate) fn enter(key: &Key) -> InjectResult<Self> {
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(error) = cycle_error(&stack, key) {
                return Err(error);
            }
            stack.push(key.clone());
            Ok(Self { depth: stack.len() })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|stack| stack.borrow_mut().truncate(self.depth - 1));
    }
}

/// 用守卫包装工厂
pub(crate) fn guarded(key: Key, factory: Factory) -> Factory {
    Arc::new(move || {
        let _guard = ResolutionGuard::enter(&key)?;
        factory()
    })
}

fn cycle_error(path: &[Key], key: &Key) -> Option<InjectError> {
    let start = path.iter().position(|k| k == key)?;
    let mut chain = path[start..].to_vec();
    chain.push(key.clone());
    Some(InjectError::CircularDependency { chain })
}

impl InjectorInner {
    /// 检查从 `key` 出发的构造图中没有经由非延迟依赖形成的环
    pub(crate) fn check_acyclic(&self, key: &Key, construction: ConstructionFn) -> InjectResult<()> {
        let mut path = Vec::new();
        let mut verified = HashSet::new();
        self.walk(key, construction, &mut path, &mut verified)
    }

    fn walk(
        &self,
        key: &Key,
        construction: ConstructionFn,
        path: &mut Vec<Key>,
        verified: &mut HashSet<Key>,
    ) -> InjectResult<()> {
        if let Some(error) = cycle_error(path, key) {
            return Err(error);
        }
        if verified.contains(key) {
            return Ok(());
        }
        path.push(key.clone());
        let point = construction();
        let dependencies = point
            .injection_points()
            .filter(|p| p.source() == PointSource::Dependency && !p.is_deferred());
        for dependency in dependencies {
            if let Some(next) = self.walk_target(dependency) {
                self.walk(dependency.key(), next, path, verified)?;
            }
        }
        path.pop();
        verified.insert(key.clone());
        Ok(())
    }

    /// 依赖继续展开的构造点；显式绑定的工厂不展开
    fn walk_target(&self, point: &InjectionPoint) -> Option<ConstructionFn> {
        let key = point.key();
        let explicit = std::iter::once(key.clone())
            .chain(point.aliases().iter().map(|alias| key.with_name(alias.as_str())))
            .any(|candidate| self.has_explicit_binding(&candidate));
        if explicit {
            return None;
        }
        point
            .construction()
            .or_else(|| self.registered_construction(key.type_info()))
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    IN_PROGRESS.with(|stack| stack.borrow().len())
}
