use metamodel_kernel::{
    Facet, FacetFactory, FacetValue, FeatureType, FeatureTypes, MetamodelError, Precedence,
    ProcessMethodContext, ProcessParameterContext, facet_type,
};

/// Properties and scalar parameters are mandatory unless declared optional.
#[derive(Debug, Default)]
pub struct MandatoryFacetDefaultFactory;

fn mandatory_by_default() -> Facet {
    Facet::new(facet_type::MANDATORY, Precedence::Default, FacetValue::Flag(true))
}

impl FacetFactory for MandatoryFacetDefaultFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::PROPERTIES_ONLY.union(FeatureTypes::PARAMETERS_ONLY)
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        ctx.add_facet(mandatory_by_default());
        Ok(())
    }

    fn process_params(&self, ctx: &mut ProcessParameterContext<'_>) -> Result<(), MetamodelError> {
        if ctx.feature_type() == FeatureType::ActionParameterScalar {
            ctx.add_facet(mandatory_by_default());
        }
        Ok(())
    }
}
