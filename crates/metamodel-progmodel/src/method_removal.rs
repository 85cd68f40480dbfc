//! Factories that take plumbing methods out of the pool before members are identified.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::naming::strip_prefix;
use metamodel_kernel::{
    Capabilities, FacetFactory, FeatureTypes, MethodDescriptor, MethodFilteringFacetFactory,
    MetamodelError, ProcessClassContext,
};

/// Prefixes of methods woven in by persistence enhancers.
const IGNORED_PREFIXES: &[&str] = &["jdo", "pc", "_persistence"];

/// Methods every class inherits from the root object type.
const OBJECT_METHODS: &[&str] = &[
    "clone", "equals", "finalize", "getClass", "hashCode", "notify", "notifyAll", "toString",
    "wait",
];

/// Removes static methods, `@Programmatic` methods, enhancer-generated
/// methods and root object methods.
#[derive(Debug, Default)]
pub struct RemoveIgnoredMethodsFacetFactory;

impl RemoveIgnoredMethodsFacetFactory {
    pub fn is_ignored(method: &MethodDescriptor) -> bool {
        method.is_static
            || method.has_annotation(annotation::PROGRAMMATIC)
            || OBJECT_METHODS.contains(&method.name.as_str())
            || IGNORED_PREFIXES
                .iter()
                .any(|prefix| strip_prefix(&method.name, prefix).is_some())
    }
}

impl FacetFactory for RemoveIgnoredMethodsFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::OBJECTS_ONLY
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        let removed = ctx.remover().remove_methods(&Self::is_ignored);
        if !removed.is_empty() {
            tracing::debug!(
                class = %ctx.class().name,
                removed = ?removed.iter().map(|method| method.name.as_str()).collect::<Vec<_>>(),
                "ignored methods removed"
            );
        }
        Ok(())
    }
}

/// Treats `iterator()` as plumbing so iterable domain classes don't expose it as an action.
#[derive(Debug, Default)]
pub struct IteratorFilteringFacetFactory;

impl FacetFactory for IteratorFilteringFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::NONE
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_method_filtering(self)
    }
}

impl MethodFilteringFacetFactory for IteratorFilteringFacetFactory {
    fn recognizes(&self, method: &MethodDescriptor) -> bool {
        method.name == "iterator" && method.parameters.is_empty()
    }
}
