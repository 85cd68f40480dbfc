//! Supporting methods: `hideX`, `disableX`, `validateX`, `defaultX` and `choicesX`.
//!
//! Each is claimed from the method pool for the member it supports, so none
//! of them is mistaken for an action. Parameter support methods carry the
//! parameter index: `default0PlaceOrder`, `choices1PlaceOrder`.

use metamodel_kernel::naming::capitalize;
use metamodel_kernel::{
    Capabilities, Facet, FacetFactory, FacetType, FacetValue, FeatureType, FeatureTypes,
    MetamodelError, MethodDescriptor, MethodRemover, Precedence, ProcessMethodContext,
    ProcessParameterContext, facet_type,
};

pub const SUPPORTING_METHOD_PREFIXES: &[&str] =
    &["hide", "disable", "validate", "default", "choices"];

/// Removes the first remaining method called `name` that `accepts` allows.
fn claim(
    remover: &mut dyn MethodRemover,
    name: &str,
    accepts: impl Fn(&MethodDescriptor) -> bool,
) -> Option<MethodDescriptor> {
    remover
        .remove_methods(&|method| method.name == name && accepts(method))
        .into_iter()
        .next()
}

fn supporting(facet_type: FacetType, method: MethodDescriptor) -> Facet {
    Facet::new(facet_type, Precedence::Explicit, FacetValue::Method(method.name))
}

#[derive(Debug, Default)]
pub struct SupportingMethodsFacetFactory;

impl FacetFactory for SupportingMethodsFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::MEMBERS.union(FeatureTypes::PARAMETERS_ONLY)
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        let member = capitalize(ctx.holder().name());
        let member_method = ctx.method();
        let no_args = |method: &MethodDescriptor| method.parameters.is_empty();

        if let Some(hide) = claim(ctx.remover(), &format!("hide{member}"), |method| {
            no_args(method) && method.return_type.is_boolean()
        }) {
            ctx.add_facet(supporting(facet_type::HIDE_FOR_CONTEXT, hide));
        }
        if let Some(disable) = claim(ctx.remover(), &format!("disable{member}"), |method| {
            no_args(method) && method.return_type.is_string()
        }) {
            ctx.add_facet(supporting(facet_type::DISABLE_FOR_CONTEXT, disable));
        }

        match ctx.feature_type() {
            FeatureType::Property => {
                let value_type = &member_method.return_type;
                let validates_value = |method: &MethodDescriptor| {
                    method.parameters.len() == 1 && method.parameters[0].type_ref == *value_type
                };
                if let Some(validate) =
                    claim(ctx.remover(), &format!("validate{member}"), validates_value)
                {
                    ctx.add_facet(supporting(facet_type::VALIDATE, validate));
                }
                if let Some(default) = claim(ctx.remover(), &format!("default{member}"), no_args) {
                    ctx.add_facet(supporting(facet_type::DEFAULTS, default));
                }
                if let Some(choices) = claim(ctx.remover(), &format!("choices{member}"), no_args) {
                    ctx.add_facet(supporting(facet_type::CHOICES, choices));
                }
            }
            FeatureType::Action => {
                let parameter_types = member_method.parameter_types();
                let validates_arguments =
                    |method: &MethodDescriptor| method.parameter_types() == parameter_types;
                if let Some(validate) =
                    claim(ctx.remover(), &format!("validate{member}"), validates_arguments)
                {
                    ctx.add_facet(supporting(facet_type::VALIDATE, validate));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn process_params(&self, ctx: &mut ProcessParameterContext<'_>) -> Result<(), MetamodelError> {
        let action = capitalize(&ctx.method().name);
        let index = ctx.param_index();
        let no_args = |method: &MethodDescriptor| method.parameters.is_empty();

        if let Some(default) = claim(ctx.remover(), &format!("default{index}{action}"), no_args) {
            ctx.add_facet(supporting(facet_type::DEFAULTS, default));
        }
        if let Some(choices) = claim(ctx.remover(), &format!("choices{index}{action}"), no_args) {
            ctx.add_facet(supporting(facet_type::CHOICES, choices));
        }
        Ok(())
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none().with_method_prefixes(SUPPORTING_METHOD_PREFIXES)
    }
}
