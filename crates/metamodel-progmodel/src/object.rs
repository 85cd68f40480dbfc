//! Object-level annotation and value-type factories.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::{
    BeanSort, Facet, FacetFactory, FacetValue, FeatureTypes, MetamodelError, Precedence,
    ProcessClassContext, facet_type,
};

/// `@DomainObject`: editing and the object-wide domain event types.
#[derive(Debug, Default)]
pub struct DomainObjectAnnotationFacetFactory;

impl FacetFactory for DomainObjectAnnotationFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::OBJECTS_ONLY
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        let Some(domain_object) = ctx.class().annotation(annotation::DOMAIN_OBJECT) else {
            return Ok(());
        };

        match domain_object.attr_str("editing") {
            None | Some("AS_CONFIGURED") | Some("ENABLED") => {}
            Some("DISABLED") => {
                ctx.add_facet(Facet::marker(facet_type::IMMUTABLE, Precedence::Explicit));
            }
            Some(other) => {
                ctx.add_facet(
                    Facet::new(facet_type::IMMUTABLE, Precedence::Fallback, FacetValue::Flag(false))
                        .with_metadata_error(format!(
                            "@DomainObject(editing) has unknown value '{other}'"
                        )),
                );
            }
        }

        let events = [
            ("actionDomainEvent", facet_type::OBJECT_ACTION_DOMAIN_EVENT),
            ("propertyDomainEvent", facet_type::OBJECT_PROPERTY_DOMAIN_EVENT),
        ];
        for (attribute, facet_type) in events {
            if let Some(event_type) = domain_object.attr_str(attribute) {
                ctx.add_facet(Facet::new(
                    facet_type,
                    Precedence::Explicit,
                    FacetValue::TypeName(event_type.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Value types: a value facet naming the semantics provider, and immutability.
#[derive(Debug, Default)]
pub struct ValueFacetFactory;

impl FacetFactory for ValueFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::OBJECTS_ONLY
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        if ctx.holder().bean_sort() != BeanSort::Value {
            return Ok(());
        }
        let class = ctx.class();
        let (precedence, provider) = match class.annotation(annotation::VALUE) {
            Some(value) => (
                Precedence::Explicit,
                value.attr_str("semanticsProvider").unwrap_or(class.name.as_str()),
            ),
            // registered through the context's value type registry
            None => (Precedence::Inferred, class.name.as_str()),
        };
        ctx.add_facet(Facet::new(
            facet_type::VALUE,
            precedence,
            FacetValue::TypeName(provider.to_string()),
        ));
        ctx.add_facet(Facet::marker(facet_type::IMMUTABLE, Precedence::Inferred));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{introspect_with, view_model};
    use metamodel_kernel::{Annotation, ClassDescriptor, FacetHolder};

    #[test]
    fn editing_disabled_marks_the_object_immutable() {
        let class = ClassDescriptor::new("dom.Invoice").annotated(
            Annotation::new(annotation::DOMAIN_OBJECT)
                .with("editing", "DISABLED")
                .with("actionDomainEvent", "dom.InvoiceActionEvent"),
        );
        let spec = introspect_with(|| DomainObjectAnnotationFacetFactory, class);
        assert_eq!(
            spec.get_facet(facet_type::IMMUTABLE).and_then(Facet::as_flag),
            Some(true)
        );
        assert_eq!(
            spec.get_facet(facet_type::OBJECT_ACTION_DOMAIN_EVENT)
                .and_then(Facet::as_text),
            Some("dom.InvoiceActionEvent")
        );
        assert!(!spec.contains_facet(facet_type::OBJECT_PROPERTY_DOMAIN_EVENT));
    }

    #[test]
    fn unknown_editing_value_is_a_metadata_error() {
        let class = ClassDescriptor::new("dom.Invoice")
            .annotated(Annotation::new(annotation::DOMAIN_OBJECT).with("editing", "SOMETIMES"));
        let spec = introspect_with(|| DomainObjectAnnotationFacetFactory, class);
        assert_eq!(
            spec.metadata_errors(),
            vec!["@DomainObject(editing) has unknown value 'SOMETIMES'"]
        );
        assert_eq!(
            spec.get_facet(facet_type::IMMUTABLE).and_then(Facet::as_flag),
            Some(false)
        );
    }

    #[test]
    fn value_types_get_a_value_facet() {
        let annotated = ClassDescriptor::new("dom.Money").annotated(
            Annotation::new(annotation::VALUE).with("semanticsProvider", "dom.MoneySemantics"),
        );
        let spec = introspect_with(|| ValueFacetFactory, annotated);
        let value = spec.get_facet(facet_type::VALUE).expect("value facet");
        assert_eq!(value.as_text(), Some("dom.MoneySemantics"));
        assert_eq!(value.precedence(), Precedence::Explicit);

        let builtin =
            introspect_with(|| ValueFacetFactory, ClassDescriptor::new("java.lang.String"));
        let value = builtin.get_facet(facet_type::VALUE).expect("value facet");
        assert_eq!(value.precedence(), Precedence::Inferred);
        assert!(builtin.contains_facet(facet_type::IMMUTABLE));

        let entity = introspect_with(|| ValueFacetFactory, view_model("dom.Customer"));
        assert!(!entity.contains_facet(facet_type::VALUE));
    }
}
