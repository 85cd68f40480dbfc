//! Property and collection accessors.

use metamodel_kernel::naming::{capitalize, strip_prefix};
use metamodel_kernel::{
    Capabilities, Facet, FacetFactory, FacetValue, FeatureType, FeatureTypes, MetamodelError,
    MethodDescriptor, MethodRemover, Precedence, ProcessMethodContext,
    PropertyOrCollectionIdentifyingFacetFactory, facet_type,
};

/// Identifies `getX()` accessors (and `isX()` for booleans), claims them
/// as properties or collections and pairs properties with their `setX` setter.
#[derive(Debug, Default)]
pub struct AccessorFacetFactory;

impl AccessorFacetFactory {
    fn is_getter(method: &MethodDescriptor) -> bool {
        if method.is_static || !method.parameters.is_empty() || method.return_type.is_void() {
            return false;
        }
        strip_prefix(&method.name, "get").is_some()
            || (strip_prefix(&method.name, "is").is_some() && method.return_type.is_boolean())
    }

    fn process_property(ctx: &mut ProcessMethodContext<'_>) {
        let accessor = ctx.method();
        ctx.add_facet(Facet::new(
            facet_type::PROPERTY_ACCESSOR,
            Precedence::Default,
            FacetValue::Method(accessor.name.clone()),
        ));

        let setter_name = format!("set{}", capitalize(ctx.holder().name()));
        let setters = ctx.remover().remove_methods(&|method| {
            method.name == setter_name
                && method.parameters.len() == 1
                && method.parameters[0].type_ref == accessor.return_type
        });
        match setters.into_iter().next() {
            Some(setter) => {
                ctx.add_facet(Facet::new(
                    facet_type::PROPERTY_SETTER,
                    Precedence::Default,
                    FacetValue::Method(setter.name),
                ));
            }
            None => {
                ctx.add_facet(Facet::new(
                    facet_type::DISABLED,
                    Precedence::Inferred,
                    FacetValue::Flag(true),
                ));
            }
        }
    }
}

impl FacetFactory for AccessorFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::PROPERTIES_AND_COLLECTIONS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        match ctx.feature_type() {
            FeatureType::Property => Self::process_property(ctx),
            FeatureType::Collection => {
                let accessor = ctx.method().name.clone();
                ctx.add_facet(Facet::new(
                    facet_type::COLLECTION_ACCESSOR,
                    Precedence::Default,
                    FacetValue::Method(accessor),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_property_or_collection_identifying(self)
    }
}

impl PropertyOrCollectionIdentifyingFacetFactory for AccessorFacetFactory {
    fn is_property_or_collection_getter(&self, method: &MethodDescriptor) -> bool {
        Self::is_getter(method)
    }

    fn is_collection_accessor(&self, method: &MethodDescriptor) -> bool {
        Self::is_getter(method) && method.return_type.is_collection()
    }

    fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    ) {
        out.extend(remover.remove_methods(&|method| {
            Self::is_getter(method) && !method.return_type.is_collection()
        }));
    }

    fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    ) {
        out.extend(remover.remove_methods(&|method| self.is_collection_accessor(method)));
    }
}
