//! Framework defaults installed before any other factory runs.

use metamodel_kernel::naming::natural_name;
use metamodel_kernel::{
    Facet, FacetFactory, FacetType, FacetValue, FeatureType, FeatureTypes, MetamodelError,
    Precedence, ProcessClassContext, ProcessMethodContext, ProcessParameterContext, facet_type,
};

/// Icon used for objects that declare none.
pub const DEFAULT_CSS_CLASS_FA: &str = "fa-cube";

/// Natural names everywhere, a default icon for objects and visible,
/// editable members.
#[derive(Debug, Default)]
pub struct FallbackFacetFactory;

fn fallback_text(facet_type: FacetType, text: String) -> Facet {
    Facet::new(facet_type, Precedence::Fallback, FacetValue::Text(text))
}

impl FacetFactory for FallbackFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::EVERYTHING
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        let named = natural_name(ctx.class().simple_name());
        ctx.add_facet(fallback_text(facet_type::NAMED, named));
        ctx.add_facet(fallback_text(
            facet_type::CSS_CLASS_FA,
            DEFAULT_CSS_CLASS_FA.to_string(),
        ));
        Ok(())
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        let named = natural_name(ctx.holder().name());
        ctx.add_facet(fallback_text(facet_type::NAMED, named));
        ctx.add_facet(Facet::new(
            facet_type::HIDDEN,
            Precedence::Fallback,
            FacetValue::Flag(false),
        ));
        if ctx.feature_type() != FeatureType::Action {
            ctx.add_facet(Facet::new(
                facet_type::DISABLED,
                Precedence::Fallback,
                FacetValue::Flag(false),
            ));
        }
        Ok(())
    }

    fn process_params(&self, ctx: &mut ProcessParameterContext<'_>) -> Result<(), MetamodelError> {
        let named = natural_name(&ctx.method().parameters[ctx.param_index()].name);
        ctx.add_facet(fallback_text(facet_type::NAMED, named));
        Ok(())
    }
}
