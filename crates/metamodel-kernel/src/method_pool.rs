//! The pool of a class's methods that have not been claimed yet.

use crate::descriptor::MethodDescriptor;
use crate::factory::MethodRemover;

#[derive(Debug, Clone, Default)]
pub struct MethodPool {
    methods: Vec<MethodDescriptor>,
}

impl MethodPool {
    pub fn new(methods: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }

    /// Methods not yet claimed, in declaration order.
    pub fn remaining(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl MethodRemover for MethodPool {
    fn remove_methods(
        &mut self,
        predicate: &dyn Fn(&MethodDescriptor) -> bool,
    ) -> Vec<MethodDescriptor> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.methods)
            .into_iter()
            .partition(|method| predicate(method));
        self.methods = kept;
        removed
    }

    fn remove_method(&mut self, method: &MethodDescriptor) -> bool {
        match self.methods.iter().position(|m| m.same_signature(method)) {
            Some(idx) => {
                self.methods.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParameterDescriptor;

    fn pool() -> MethodPool {
        MethodPool::new([
            MethodDescriptor::new("getName").returning("java.lang.String"),
            MethodDescriptor::new("hideName"),
            MethodDescriptor::new("placeOrder").param(ParameterDescriptor::new("qty", "int")),
            MethodDescriptor::new("placeOrder"),
        ])
    }

    #[test]
    fn remove_methods_keeps_declaration_order() {
        let mut pool = pool();
        let removed = pool.remove_methods(&|m| m.name.starts_with("hide"));
        assert_eq!(removed.len(), 1);
        let names: Vec<&str> = pool.remaining().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getName", "placeOrder", "placeOrder"]);
    }

    #[test]
    fn remove_method_matches_on_signature() {
        let mut pool = pool();
        assert!(pool.remove_method(&MethodDescriptor::new("placeOrder")));
        assert!(!pool.remove_method(&MethodDescriptor::new("placeOrder")));
        assert_eq!(pool.remaining()[1].parameter_count(), 1);
        assert_eq!(pool.remove_methods_named("placeOrder").len(), 1);
        assert_eq!(pool.len(), 2);
    }
}
