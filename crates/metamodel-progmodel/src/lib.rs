//! The standard programming model.
//!
//! Facet factories for the conventions and annotations of a naked-objects
//! domain model, registered in phase order, together with the validators and
//! post-processors that run once the metamodel is built.
//!
//! ```ignore
//! let context = MetaModelContext::new(MetamodelConfig::load("metamodel.toml")?);
//! let mut loader = standard_loader(context)?;
//! let metamodel = loader.load(&classes)?;
//! ```

mod accessors;
mod fallback;
mod layout;
mod logical_type;
mod mandatory;
mod members;
mod method_removal;
mod object;
mod post_processors;
mod supporting;
mod validators;

pub use accessors::AccessorFacetFactory;
pub use fallback::{DEFAULT_CSS_CLASS_FA, FallbackFacetFactory};
pub use layout::{LayoutFacetFactory, MemberOrderFacetFactory, ParameterLayoutFacetFactory};
pub use logical_type::{LogicalTypeFacetFactory, LogicalTypeUniquenessValidator};
pub use mandatory::MandatoryFacetDefaultFactory;
pub use members::{
    ActionAnnotationFacetFactory, CollectionAnnotationFacetFactory,
    DEFAULT_ACTION_DOMAIN_EVENT, DEFAULT_COLLECTION_DOMAIN_EVENT, DEFAULT_PROPERTY_DOMAIN_EVENT,
    ParameterAnnotationFacetFactory, PropertyAnnotationFacetFactory, REGEX_PATTERN,
    contributed_as,
};
pub use method_removal::{IteratorFilteringFacetFactory, RemoveIgnoredMethodsFacetFactory};
pub use object::{DomainObjectAnnotationFacetFactory, ValueFacetFactory};
pub use post_processors::{DomainEventPostProcessor, ImmutableEditingPostProcessor};
pub use supporting::{SUPPORTING_METHOD_PREFIXES, SupportingMethodsFacetFactory};
pub use validators::{
    ActionAnnotationShouldEnforceConcreteTypeValidator, ActionOverloadingValidator,
};

use metamodel_kernel::{
    Marker, MetaModelContext, MetadataErrorValidator, MetamodelConfig, MetamodelError,
    ProcessingOrder, ProgrammingModel, SpecificationLoader,
};

/// Registers every standard factory, validator and post-processor.
///
/// The returned model is not yet initialized; the marker filter of `config`
/// is applied when it is handed to a [`SpecificationLoader`].
pub fn standard_programming_model(
    config: &MetamodelConfig,
) -> Result<ProgrammingModel, MetamodelError> {
    use ProcessingOrder::*;

    let mut model = ProgrammingModel::new();

    model.add_factory(A1FallbackDefaults, || FallbackFacetFactory, &[])?;

    let unique_logical_types = config.validation.unique_logical_types;
    model.add_factory(
        B1ObjectNaming,
        move || LogicalTypeFacetFactory::new(unique_logical_types),
        &[],
    )?;
    model.add_factory(B1ObjectNaming, || DomainObjectAnnotationFacetFactory, &[])?;

    model.add_factory(C1MethodRemoving, || RemoveIgnoredMethodsFacetFactory, &[])?;
    model.add_factory(C1MethodRemoving, || IteratorFilteringFacetFactory, &[])?;

    model.add_factory(D1MandatorySupport, || MandatoryFacetDefaultFactory, &[])?;

    model.add_factory(E1MemberModelling, || AccessorFacetFactory, &[])?;
    model.add_factory(E1MemberModelling, || ActionAnnotationFacetFactory, &[])?;
    model.add_factory(E1MemberModelling, || PropertyAnnotationFacetFactory, &[])?;
    model.add_factory(E1MemberModelling, || CollectionAnnotationFacetFactory, &[])?;
    model.add_factory(E1MemberModelling, || ParameterAnnotationFacetFactory, &[])?;
    model.add_factory(E1MemberModelling, || SupportingMethodsFacetFactory, &[])?;

    model.add_factory(F1Layout, || LayoutFacetFactory, &[])?;
    model.add_factory(F1Layout, || ParameterLayoutFacetFactory, &[])?;
    model.add_factory(F1Layout, || MemberOrderFacetFactory, &[Marker::Deprecated])?;

    model.add_factory(G1ValueTypes, || ValueFacetFactory, &[])?;

    model.add_validator(|| MetadataErrorValidator, &[])?;
    if config.validation.action_overloading {
        model.add_validator(|| ActionOverloadingValidator, &[])?;
    }
    if config.validation.concrete_type_actions {
        model.add_validator(|| ActionAnnotationShouldEnforceConcreteTypeValidator, &[])?;
    }

    model.add_post_processor(Z1Finally, || ImmutableEditingPostProcessor, &[])?;
    model.add_post_processor(Z1Finally, || DomainEventPostProcessor, &[])?;

    tracing::debug!(
        registrations = model.registrations().len(),
        "standard programming model assembled"
    );
    Ok(model)
}

/// A loader over the standard programming model, configured from `context`.
pub fn standard_loader(context: MetaModelContext) -> Result<SpecificationLoader, MetamodelError> {
    let model = standard_programming_model(context.config())?;
    SpecificationLoader::new(model, context)
}
