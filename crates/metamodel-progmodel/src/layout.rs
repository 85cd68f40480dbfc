//! Layout annotations: names, descriptions, icons, visibility and member order.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::{
    Annotation, Facet, FacetFactory, FacetType, FacetValue, FeatureType, FeatureTypes,
    MetamodelError, Precedence, ProcessClassContext, ProcessMethodContext,
    ProcessParameterContext, facet_type,
};
use serde_json::Value;

/// Text attributes shared by every `*Layout` annotation.
const TEXT_ATTRIBUTES: [(&str, FacetType); 3] = [
    ("named", facet_type::NAMED),
    ("describedAs", facet_type::DESCRIBED_AS),
    ("cssClassFa", facet_type::CSS_CLASS_FA),
];

fn text_facets(layout: &Annotation) -> Vec<Facet> {
    TEXT_ATTRIBUTES
        .iter()
        .filter_map(|(attribute, facet_type)| {
            layout.attr_str(attribute).map(|text| {
                Facet::new(*facet_type, Precedence::Explicit, FacetValue::Text(text.to_string()))
            })
        })
        .collect()
}

/// A member order sequence given either as `"1.2"` or as a bare number.
pub(crate) fn sequence(annotation: &Annotation) -> Option<String> {
    match annotation.attr("sequence")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// `@DomainObjectLayout`, `@PropertyLayout`, `@CollectionLayout` and `@ActionLayout`.
#[derive(Debug, Default)]
pub struct LayoutFacetFactory;

impl LayoutFacetFactory {
    /// Layout annotations to consult for a member, most specific first. A
    /// mixin main method may carry the layout of the member it contributes.
    fn layout_annotations(
        feature_type: FeatureType,
        is_mixin_main: bool,
    ) -> &'static [&'static str] {
        match (feature_type, is_mixin_main) {
            (FeatureType::Property, _) => &[annotation::PROPERTY_LAYOUT],
            (FeatureType::Collection, _) => &[annotation::COLLECTION_LAYOUT],
            (_, true) => &[
                annotation::ACTION_LAYOUT,
                annotation::PROPERTY_LAYOUT,
                annotation::COLLECTION_LAYOUT,
            ],
            _ => &[annotation::ACTION_LAYOUT],
        }
    }
}

impl FacetFactory for LayoutFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::EVERYTHING_BUT_PARAMETERS
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        if let Some(layout) = ctx.class().annotation(annotation::DOMAIN_OBJECT_LAYOUT) {
            for facet in text_facets(layout) {
                ctx.add_facet(facet);
            }
        }
        Ok(())
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        let method = ctx.method();
        let Some(layout) = Self::layout_annotations(ctx.feature_type(), ctx.is_mixin_main())
            .iter()
            .find_map(|name| method.annotation(name))
        else {
            return Ok(());
        };

        for facet in text_facets(layout) {
            ctx.add_facet(facet);
        }
        if let Some(sequence) = sequence(layout) {
            ctx.add_facet(Facet::new(
                facet_type::MEMBER_ORDER,
                Precedence::Explicit,
                FacetValue::Text(sequence),
            ));
        }
        if let Some(hidden) = layout.attr_bool("hidden") {
            ctx.add_facet(Facet::new(
                facet_type::HIDDEN,
                Precedence::Explicit,
                FacetValue::Flag(hidden),
            ));
        }
        Ok(())
    }
}

/// `@ParameterLayout`: parameter names and descriptions.
#[derive(Debug, Default)]
pub struct ParameterLayoutFacetFactory;

impl FacetFactory for ParameterLayoutFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::PARAMETERS_ONLY
    }

    fn process_params(&self, ctx: &mut ProcessParameterContext<'_>) -> Result<(), MetamodelError> {
        let parameter = &ctx.method().parameters[ctx.param_index()];
        let Some(layout) = parameter.annotation(annotation::PARAMETER_LAYOUT) else {
            return Ok(());
        };
        for facet in text_facets(layout)
            .into_iter()
            .filter(|facet| facet.facet_type() != facet_type::CSS_CLASS_FA)
        {
            ctx.add_facet(facet);
        }
        Ok(())
    }
}

/// The older `@MemberOrder(sequence)` annotation. Superseded by the layout
/// annotations' `sequence`, which wins when both are present.
#[derive(Debug, Default)]
pub struct MemberOrderFacetFactory;

impl FacetFactory for MemberOrderFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::MEMBERS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        let Some(member_order) = ctx.method().annotation(annotation::MEMBER_ORDER) else {
            return Ok(());
        };
        match sequence(member_order) {
            Some(sequence) => {
                ctx.add_facet(Facet::new(
                    facet_type::MEMBER_ORDER,
                    Precedence::Inferred,
                    FacetValue::Text(sequence),
                ));
            }
            None => {
                ctx.add_facet(
                    Facet::new(
                        facet_type::MEMBER_ORDER,
                        Precedence::Fallback,
                        FacetValue::Text(String::new()),
                    )
                    .with_metadata_error("@MemberOrder has no sequence"),
                );
            }
        }
        Ok(())
    }
}
