//! Post-processing of fully introspected specifications.

use crate::context::MetaModelContext;
use crate::error::{MetamodelError, short_type_name};
use crate::spec::ObjectSpecification;

/// Runs after every class has been introspected and mixins contributed,
/// and before validation.
///
/// Post-processors typically cascade object-level facets down to members.
pub trait ObjectSpecificationPostProcessor: Send + Sync + 'static {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn post_process(
        &self,
        spec: &mut ObjectSpecification,
        context: &MetaModelContext,
    ) -> Result<(), MetamodelError>;
}
