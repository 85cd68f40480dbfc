//! Object-level facets cascaded down to members once every class is known.

use metamodel_kernel::{
    Facet, FacetHolder, FacetType, FacetValue, FeatureType, MetaModelContext, MetamodelError,
    ObjectSpecification, ObjectSpecificationPostProcessor, Precedence, facet_type,
};

/// Properties of an immutable object are disabled, unless a property
/// explicitly re-enables editing.
#[derive(Debug, Default)]
pub struct ImmutableEditingPostProcessor;

impl ObjectSpecificationPostProcessor for ImmutableEditingPostProcessor {
    fn post_process(
        &self,
        spec: &mut ObjectSpecification,
        _context: &MetaModelContext,
    ) -> Result<(), MetamodelError> {
        let immutable = spec
            .get_facet(facet_type::IMMUTABLE)
            .and_then(Facet::as_flag)
            .unwrap_or(false);
        if !immutable {
            return Ok(());
        }
        for property in spec
            .members_mut()
            .iter_mut()
            .filter(|member| member.feature_type() == FeatureType::Property)
        {
            property.add_facet(Facet::new(
                facet_type::DISABLED,
                Precedence::Inferred,
                FacetValue::Flag(true),
            ));
        }
        Ok(())
    }
}

/// `@DomainObject(actionDomainEvent, propertyDomainEvent)` replaces the
/// framework default event of every action or property that did not name
/// its own.
#[derive(Debug, Default)]
pub struct DomainEventPostProcessor;

impl DomainEventPostProcessor {
    const CASCADES: [(FacetType, FeatureType, FacetType); 2] = [
        (
            facet_type::OBJECT_ACTION_DOMAIN_EVENT,
            FeatureType::Action,
            facet_type::ACTION_DOMAIN_EVENT,
        ),
        (
            facet_type::OBJECT_PROPERTY_DOMAIN_EVENT,
            FeatureType::Property,
            facet_type::PROPERTY_DOMAIN_EVENT,
        ),
    ];
}

impl ObjectSpecificationPostProcessor for DomainEventPostProcessor {
    fn post_process(
        &self,
        spec: &mut ObjectSpecification,
        _context: &MetaModelContext,
    ) -> Result<(), MetamodelError> {
        for (object_event, feature_type, member_event) in Self::CASCADES {
            let Some(event_type) = spec
                .get_facet(object_event)
                .and_then(Facet::as_text)
                .map(str::to_string)
            else {
                continue;
            };
            // mixed-in members keep the events of their mixin
            for member in spec.members_mut().iter_mut().filter(|member| {
                member.feature_type() == feature_type && !member.is_mixed_in()
            }) {
                let defaulted = member
                    .get_facet(member_event)
                    .is_none_or(|facet| facet.precedence() <= Precedence::Default);
                if defaulted {
                    member.add_facet(Facet::new(
                        member_event,
                        Precedence::Inferred,
                        FacetValue::TypeName(event_type.clone()),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metamodel_kernel::{BeanSort, ClassDescriptor, FacetedMethod, MethodDescriptor};

    fn customer() -> ObjectSpecification {
        let mut spec =
            ObjectSpecification::new(ClassDescriptor::new("dom.Customer"), BeanSort::Entity);
        for getter in ["getName", "getNotes"] {
            spec.add_member(FacetedMethod::for_association(
                "dom.Customer",
                MethodDescriptor::new(getter).returning("java.lang.String"),
                FeatureType::Property,
            ));
        }
        spec.add_member(FacetedMethod::for_action(
            "dom.Customer",
            MethodDescriptor::new("archive"),
        ));
        spec.add_member(FacetedMethod::for_action(
            "dom.Customer",
            MethodDescriptor::new("rename"),
        ));
        spec
    }

    fn flag(spec: &ObjectSpecification, member: &str, facet_type: FacetType) -> Option<bool> {
        spec.member(member)
            .and_then(|member| member.get_facet(facet_type))
            .and_then(Facet::as_flag)
    }

    fn text<'a>(
        spec: &'a ObjectSpecification,
        member: &str,
        facet_type: FacetType,
    ) -> Option<&'a str> {
        spec.member(member)
            .and_then(|member| member.get_facet(facet_type))
            .and_then(Facet::as_text)
    }

    #[test]
    fn immutable_objects_disable_their_properties() {
        let mut spec = customer();
        spec.members_mut()[1].add_facet(Facet::new(
            facet_type::DISABLED,
            Precedence::Explicit,
            FacetValue::Flag(false),
        ));
        spec.add_facet(Facet::marker(facet_type::IMMUTABLE, Precedence::Explicit));

        ImmutableEditingPostProcessor
            .post_process(&mut spec, &MetaModelContext::default())
            .expect("post-processes");
        assert_eq!(flag(&spec, "name", facet_type::DISABLED), Some(true));
        assert_eq!(flag(&spec, "notes", facet_type::DISABLED), Some(false));
        assert_eq!(flag(&spec, "archive", facet_type::DISABLED), None);
    }

    #[test]
    fn mutable_objects_are_left_alone() {
        let mut spec = customer();
        ImmutableEditingPostProcessor
            .post_process(&mut spec, &MetaModelContext::default())
            .expect("post-processes");
        assert_eq!(flag(&spec, "name", facet_type::DISABLED), None);
    }

    #[test]
    fn object_events_replace_default_member_events() {
        let mut spec = customer();
        spec.add_facet(Facet::new(
            facet_type::OBJECT_ACTION_DOMAIN_EVENT,
            Precedence::Explicit,
            FacetValue::TypeName("dom.CustomerActionEvent".into()),
        ));
        spec.members_mut()[2].add_facet(Facet::new(
            facet_type::ACTION_DOMAIN_EVENT,
            Precedence::Default,
            FacetValue::TypeName("ActionDomainEvent.Default".into()),
        ));
        spec.members_mut()[3].add_facet(Facet::new(
            facet_type::ACTION_DOMAIN_EVENT,
            Precedence::Explicit,
            FacetValue::TypeName("dom.RenameEvent".into()),
        ));

        DomainEventPostProcessor
            .post_process(&mut spec, &MetaModelContext::default())
            .expect("post-processes");
        assert_eq!(
            text(&spec, "archive", facet_type::ACTION_DOMAIN_EVENT),
            Some("dom.CustomerActionEvent")
        );
        assert_eq!(
            text(&spec, "rename", facet_type::ACTION_DOMAIN_EVENT),
            Some("dom.RenameEvent")
        );
        // no object-level property event declared
        assert_eq!(text(&spec, "name", facet_type::PROPERTY_DOMAIN_EVENT), None);
    }
}
