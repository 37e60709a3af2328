use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{transformer::AssemblerId, Bean, BeanKey};

/// State of one traversal of a result.
///
/// Holds the identity cache, so a key read from several rows yields a
/// single bean, and remembers which `(bean, relation)` pairs were already
/// assembled for relations applied once per bean.
#[derive(Default)]
pub struct MaterializationContext {
    beans: HashMap<(TypeId, BeanKey), Rc<dyn Any>>,
    treated: HashSet<(usize, AssemblerId)>,
    roots: HashSet<usize>,
    retained: Vec<Rc<dyn Any>>,
}

impl MaterializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bean of type `T` identified by `key`, if this traversal built it.
    pub fn cached<T: 'static>(&self, key: &BeanKey) -> Option<Bean<T>> {
        self.beans
            .get(&(TypeId::of::<T>(), key.clone()))
            .and_then(|bean| Rc::clone(bean).downcast::<std::cell::RefCell<T>>().ok())
            .map(Bean)
    }

    pub fn cache<T: 'static>(&mut self, key: BeanKey, bean: &Bean<T>) {
        let shared: Rc<dyn Any> = Rc::clone(&bean.0) as Rc<dyn Any>;
        self.beans.insert((TypeId::of::<T>(), key), shared);
    }

    /// Keeps a bean alive until the end of the traversal. Bean addresses
    /// identify treated pairs, so none may be reused while it lasts.
    pub(crate) fn retain<T: 'static>(&mut self, bean: &Bean<T>) {
        self.retained.push(Rc::clone(&bean.0) as Rc<dyn Any>);
    }

    pub fn is_treated<T>(&self, bean: &Bean<T>, assembler: AssemblerId) -> bool {
        self.treated.contains(&(bean.address(), assembler))
    }

    /// Records the pair, returning `false` if it was already recorded.
    pub fn mark_treated<T>(&mut self, bean: &Bean<T>, assembler: AssemblerId) -> bool {
        self.treated.insert((bean.address(), assembler))
    }

    /// Records a bean handed over as a root of the result, returning
    /// `false` if it already was. A root may have been cached earlier as the
    /// related bean of another root.
    pub(crate) fn mark_root<T>(&mut self, bean: &Bean<T>) -> bool {
        self.roots.insert(bean.address())
    }

    /// Number of beans in the identity cache.
    pub fn cached_beans(&self) -> usize {
        self.beans.len()
    }
}

impl std::fmt::Debug for MaterializationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializationContext")
            .field("cached_beans", &self.beans.len())
            .field("treated", &self.treated.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cache_is_keyed_by_type_and_key() {
        let mut ctx = MaterializationContext::new();
        let key = BeanKey::new(vec![json!(1)]);
        let bean = Bean::new(String::from("one"));

        ctx.cache(key.clone(), &bean);

        assert_eq!(Some(bean), ctx.cached::<String>(&key));
        assert_eq!(None, ctx.cached::<i32>(&key));
        assert_eq!(None, ctx.cached::<String>(&BeanKey::new(vec![json!(2)])));
        assert_eq!(1, ctx.cached_beans());
    }

    #[test]
    fn pairs_are_treated_once() {
        let mut ctx = MaterializationContext::new();
        let bean = Bean::new(0);
        let assembler = AssemblerId::next();

        assert!(!ctx.is_treated(&bean, assembler));
        assert!(ctx.mark_treated(&bean, assembler));
        assert!(!ctx.mark_treated(&bean, assembler));
        assert!(!ctx.is_treated(&bean, AssemblerId::next()));
    }
}
