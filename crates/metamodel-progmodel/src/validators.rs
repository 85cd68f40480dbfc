//! Cross-member checks run once the metamodel has been built.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::{
    FacetHolder, FacetedMethod, Identifier, MetaModelValidator, ObjectSpecification,
    ValidationFailures, failure_class,
};
use std::collections::BTreeMap;

/// Actions are addressed by name alone, so a name may back only one action.
///
/// Mixed-in actions are exempt: they are named after their mixin, not a method.
#[derive(Debug, Default)]
pub struct ActionOverloadingValidator;

impl MetaModelValidator for ActionOverloadingValidator {
    fn visit(&mut self, spec: &ObjectSpecification, failures: &mut ValidationFailures) {
        let mut by_name: BTreeMap<&str, Vec<&FacetedMethod>> = BTreeMap::new();
        for action in spec.actions().filter(|action| !action.is_mixed_in()) {
            by_name.entry(action.name()).or_default().push(action);
        }

        for (name, actions) in by_name {
            if actions.len() < 2 {
                continue;
            }
            let signatures: Vec<String> = actions
                .iter()
                .map(|action| action.method().signature())
                .collect();
            failures.raise_formatted(
                failure_class::ACTION_OVERLOADING,
                spec,
                actions[0].identifier(),
                format_args!(
                    "{}: action '{}' is overloaded ({}); action names must be unique",
                    spec.type_name(),
                    name,
                    signatures.join(", ")
                ),
            );
        }
    }
}

/// `@Action` on a class the metamodel cannot classify means the class was
/// meant to be a domain object but is missing its `@DomainObject` or
/// `@DomainService` annotation.
#[derive(Debug, Default)]
pub struct ActionAnnotationShouldEnforceConcreteTypeValidator;

impl MetaModelValidator for ActionAnnotationShouldEnforceConcreteTypeValidator {
    fn visit(&mut self, spec: &ObjectSpecification, failures: &mut ValidationFailures) {
        if !spec.bean_sort().is_unknown() {
            return;
        }
        for method in spec
            .descriptor()
            .methods
            .iter()
            .filter(|method| method.has_annotation(annotation::ACTION))
        {
            let origin = Identifier::action_identifier(
                spec.type_name(),
                method.name.clone(),
                method.parameter_types(),
            );
            failures.raise_formatted(
                failure_class::ACTION_ON_UNKNOWN_TYPE,
                spec,
                &origin,
                format_args!(
                    "{}: method '{}' is annotated with @Action, but the type is not a \
                     recognised domain object, mixin or service",
                    spec.type_name(),
                    method.name
                ),
            );
        }
    }
}
