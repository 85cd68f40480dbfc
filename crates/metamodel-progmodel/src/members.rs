//! `@Action`, `@Property`, `@Collection` and `@Parameter` semantics.
//!
//! Every member gets a domain event type; the annotation's `domainEvent`
//! attribute overrides the default one. Attributes with values outside their
//! vocabulary are kept as metadata errors on the facet they would have set.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::{
    Annotation, Facet, FacetFactory, FacetType, FacetValue, FeatureType, FeatureTypes,
    InvocationKind, MetamodelError, MethodDescriptor, Precedence, ProcessMethodContext,
    ProcessParameterContext, facet_type,
};
use regex::Regex;

pub const DEFAULT_ACTION_DOMAIN_EVENT: &str = "ActionDomainEvent.Default";
pub const DEFAULT_PROPERTY_DOMAIN_EVENT: &str = "PropertyDomainEvent.Default";
pub const DEFAULT_COLLECTION_DOMAIN_EVENT: &str = "CollectionDomainEvent.Default";

/// Pattern a parameter's text value must match.
pub const REGEX_PATTERN: FacetType = FacetType::new("regex_pattern");

const ACTION_SEMANTICS: &[&str] = &[
    "SAFE",
    "SAFE_AND_REQUEST_CACHEABLE",
    "IDEMPOTENT",
    "IDEMPOTENT_ARE_YOU_SURE",
    "NON_IDEMPOTENT",
    "NON_IDEMPOTENT_ARE_YOU_SURE",
];
const DEFAULT_ACTION_SEMANTICS: &str = "NON_IDEMPOTENT";

fn domain_event(
    annotation: Option<&Annotation>,
    facet_type: FacetType,
    default_event: &str,
) -> Facet {
    match annotation.and_then(|annotation| annotation.attr_str("domainEvent")) {
        Some(event_type) => Facet::new(
            facet_type,
            Precedence::Explicit,
            FacetValue::TypeName(event_type.to_string()),
        ),
        None => Facet::new(
            facet_type,
            Precedence::Default,
            FacetValue::TypeName(default_event.to_string()),
        ),
    }
}

/// `hidden = "EVERYWHERE" | "NOWHERE"`.
fn hidden(annotation: &Annotation) -> Option<Facet> {
    let flag = |precedence: Precedence, hidden: bool| {
        Facet::new(facet_type::HIDDEN, precedence, FacetValue::Flag(hidden))
    };
    let facet = match annotation.attr_str("hidden")? {
        "EVERYWHERE" => flag(Precedence::Explicit, true),
        "NOWHERE" => flag(Precedence::Explicit, false),
        other => flag(Precedence::Fallback, false).with_metadata_error(format!(
            "@{}(hidden) has unknown value '{other}'",
            annotation.name
        )),
    };
    Some(facet)
}

/// `optionality = "OPTIONAL" | "MANDATORY" | "DEFAULT"`.
fn optionality(annotation: &Annotation) -> Option<Facet> {
    let facet = match annotation.attr_str("optionality")? {
        "DEFAULT" => return None,
        "OPTIONAL" => Facet::new(
            facet_type::MANDATORY,
            Precedence::Explicit,
            FacetValue::Flag(false),
        ),
        "MANDATORY" => Facet::new(
            facet_type::MANDATORY,
            Precedence::Explicit,
            FacetValue::Flag(true),
        ),
        other => Facet::new(facet_type::MANDATORY, Precedence::Fallback, FacetValue::Flag(true))
            .with_metadata_error(format!(
                "@{}(optionality) has unknown value '{other}'",
                annotation.name
            )),
    };
    Some(facet)
}

/// Member kind a mixin main method contributes, and a diagnostic when its
/// annotations disagree. Conflicts fall back to an action.
pub fn contributed_as(method: &MethodDescriptor) -> (FeatureType, Option<String>) {
    let as_action = method.has_annotation(annotation::ACTION);
    let as_property = method.has_annotation(annotation::PROPERTY);
    let as_collection = method.has_annotation(annotation::COLLECTION);
    match (as_action, as_property, as_collection) {
        (false, true, false) => (FeatureType::Property, None),
        (false, false, true) => (FeatureType::Collection, None),
        (_, false, false) => (FeatureType::Action, None),
        _ => (
            FeatureType::Action,
            Some(format!(
                "mixin method {} declares conflicting member annotations; contributed as an action",
                method.name
            )),
        ),
    }
}

/// Invocation, semantics, domain event and visibility of actions. On a
/// mixin main method, also records what the mixin contributes.
#[derive(Debug, Default)]
pub struct ActionAnnotationFacetFactory;

impl FacetFactory for ActionAnnotationFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::ACTIONS_ONLY
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        let method = ctx.method();
        let action = method.annotation(annotation::ACTION);

        let contributed = if ctx.is_mixin_main() {
            let (feature_type, conflict) = contributed_as(method);
            let precedence = match feature_type {
                FeatureType::Action if action.is_none() => Precedence::Default,
                _ => Precedence::Explicit,
            };
            let mut contributing = Facet::new(
                facet_type::CONTRIBUTING,
                precedence,
                FacetValue::Text(feature_type.as_str().to_string()),
            );
            if let Some(conflict) = conflict {
                contributing = contributing.with_metadata_error(conflict);
            }
            ctx.add_facet(contributing);
            feature_type
        } else {
            FeatureType::Action
        };

        let kind = match contributed {
            FeatureType::Action => InvocationKind::ForAction,
            _ => InvocationKind::ForMixedInPropertyOrCollection,
        };
        ctx.add_facet(Facet::new(
            facet_type::ACTION_INVOCATION,
            Precedence::Default,
            FacetValue::Invocation {
                method: method.name.clone(),
                kind,
            },
        ));
        if contributed != FeatureType::Action {
            // events and semantics come from the property or collection factory
            return Ok(());
        }

        ctx.add_facet(domain_event(
            action,
            facet_type::ACTION_DOMAIN_EVENT,
            DEFAULT_ACTION_DOMAIN_EVENT,
        ));

        let semantics = match action.and_then(|action| action.attr_str("semantics")) {
            None => Facet::new(
                facet_type::ACTION_SEMANTICS,
                Precedence::Default,
                FacetValue::Text(DEFAULT_ACTION_SEMANTICS.to_string()),
            ),
            Some(declared) if ACTION_SEMANTICS.contains(&declared) => Facet::new(
                facet_type::ACTION_SEMANTICS,
                Precedence::Explicit,
                FacetValue::Text(declared.to_string()),
            ),
            Some(other) => Facet::new(
                facet_type::ACTION_SEMANTICS,
                Precedence::Default,
                FacetValue::Text(DEFAULT_ACTION_SEMANTICS.to_string()),
            )
            .with_metadata_error(format!("@Action(semantics) has unknown value '{other}'")),
        };
        ctx.add_facet(semantics);

        if let Some(hidden) = action.and_then(hidden) {
            ctx.add_facet(hidden);
        }
        Ok(())
    }
}

/// Whether `ctx` is a `feature_type` member, or a mixin main method contributed as one.
fn targets(ctx: &ProcessMethodContext<'_>, feature_type: FeatureType) -> bool {
    ctx.feature_type() == feature_type
        || (ctx.is_mixin_main() && contributed_as(ctx.method()).0 == feature_type)
}

/// Domain event, editing, optionality and visibility of properties.
#[derive(Debug, Default)]
pub struct PropertyAnnotationFacetFactory;

impl FacetFactory for PropertyAnnotationFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::PROPERTIES_AND_ACTIONS
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        if !targets(ctx, FeatureType::Property) {
            return Ok(());
        }
        let property = ctx.method().annotation(annotation::PROPERTY);
        ctx.add_facet(domain_event(
            property,
            facet_type::PROPERTY_DOMAIN_EVENT,
            DEFAULT_PROPERTY_DOMAIN_EVENT,
        ));
        let Some(property) = property else {
            return Ok(());
        };

        match property.attr_str("editing") {
            None | Some("AS_CONFIGURED") => {}
            Some("ENABLED") => {
                ctx.add_facet(Facet::new(
                    facet_type::DISABLED,
                    Precedence::Explicit,
                    FacetValue::Flag(false),
                ));
            }
            Some("DISABLED") => {
                ctx.add_facet(Facet::new(
                    facet_type::DISABLED,
                    Precedence::Explicit,
                    FacetValue::Flag(true),
                ));
            }
            Some(other) => {
                ctx.add_facet(
                    Facet::new(facet_type::DISABLED, Precedence::Fallback, FacetValue::Flag(false))
                        .with_metadata_error(format!(
                            "@Property(editing) has unknown value '{other}'"
                        )),
                );
            }
        }
        if let Some(mandatory) = optionality(property) {
            ctx.add_facet(mandatory);
        }
        if let Some(hidden) = hidden(property) {
            ctx.add_facet(hidden);
        }
        Ok(())
    }
}

/// Domain event and visibility of collections.
#[derive(Debug, Default)]
pub struct CollectionAnnotationFacetFactory;

impl FacetFactory for CollectionAnnotationFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::COLLECTIONS_ONLY.union(FeatureTypes::ACTIONS_ONLY)
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        if !targets(ctx, FeatureType::Collection) {
            return Ok(());
        }
        let collection = ctx.method().annotation(annotation::COLLECTION);
        ctx.add_facet(domain_event(
            collection,
            facet_type::COLLECTION_DOMAIN_EVENT,
            DEFAULT_COLLECTION_DOMAIN_EVENT,
        ));
        if let Some(hidden) = collection.and_then(hidden) {
            ctx.add_facet(hidden);
        }
        Ok(())
    }
}

/// `@Parameter`: optionality and a validated regex pattern.
#[derive(Debug, Default)]
pub struct ParameterAnnotationFacetFactory;

impl FacetFactory for ParameterAnnotationFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::PARAMETERS_ONLY
    }

    fn process_params(&self, ctx: &mut ProcessParameterContext<'_>) -> Result<(), MetamodelError> {
        let descriptor = &ctx.method().parameters[ctx.param_index()];
        let Some(parameter) = descriptor.annotation(annotation::PARAMETER) else {
            return Ok(());
        };
        if let Some(mandatory) = optionality(parameter) {
            ctx.add_facet(mandatory);
        }
        if let Some(pattern) = parameter.attr_str("regexPattern") {
            let mut facet = Facet::new(
                REGEX_PATTERN,
                Precedence::Explicit,
                FacetValue::Text(pattern.to_string()),
            );
            if let Err(err) = Regex::new(pattern) {
                facet = facet.with_metadata_error(format!(
                    "@Parameter(regexPattern) '{pattern}' does not compile: {err}"
                ));
            }
            ctx.add_facet(facet);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::AccessorFacetFactory;
    use crate::test_support::{introspect_in, introspect_with, view_model};
    use metamodel_kernel::{FacetHolder, ParameterDescriptor, ProcessingOrder, ProgrammingModel};

    #[test]
    fn actions_get_default_event_and_semantics() {
        let class = view_model("dom.Customer")
            .method(MethodDescriptor::new("archive"))
            .method(
                MethodDescriptor::new("rename").annotated(
                    Annotation::new(annotation::ACTION)
                        .with("semantics", "IDEMPOTENT")
                        .with("domainEvent", "dom.RenameEvent")
                        .with("hidden", "EVERYWHERE"),
                ),
            );
        let spec = introspect_with(|| ActionAnnotationFacetFactory, class);

        let archive = spec.member("archive").expect("archive");
        let event = archive.get_facet(facet_type::ACTION_DOMAIN_EVENT).expect("event");
        assert_eq!(event.as_text(), Some(DEFAULT_ACTION_DOMAIN_EVENT));
        assert_eq!(event.precedence(), Precedence::Default);
        assert_eq!(
            archive
                .get_facet(facet_type::ACTION_INVOCATION)
                .and_then(Facet::as_invocation),
            Some(("archive", InvocationKind::ForAction))
        );

        let rename = spec.member("rename").expect("rename");
        assert_eq!(
            rename.get_facet(facet_type::ACTION_SEMANTICS).and_then(Facet::as_text),
            Some("IDEMPOTENT")
        );
        assert_eq!(
            rename.get_facet(facet_type::ACTION_DOMAIN_EVENT).and_then(Facet::as_text),
            Some("dom.RenameEvent")
        );
        assert_eq!(
            rename.get_facet(facet_type::HIDDEN).and_then(Facet::as_flag),
            Some(true)
        );
    }

    #[test]
    fn unknown_semantics_is_recorded_not_fatal() {
        let class = view_model("dom.Customer").method(
            MethodDescriptor::new("archive")
                .annotated(Annotation::new(annotation::ACTION).with("semantics", "MOSTLY_SAFE")),
        );
        let spec = introspect_with(|| ActionAnnotationFacetFactory, class);
        let archive = spec.member("archive").expect("archive");
        assert_eq!(
            archive.metadata_errors(),
            vec!["@Action(semantics) has unknown value 'MOSTLY_SAFE'"]
        );
        assert_eq!(
            archive.get_facet(facet_type::ACTION_SEMANTICS).and_then(Facet::as_text),
            Some(DEFAULT_ACTION_SEMANTICS)
        );
    }

    #[test]
    fn contribution_follows_the_main_method_annotation() {
        let property = MethodDescriptor::new("act")
            .returning("java.lang.String")
            .annotated(Annotation::new(annotation::PROPERTY));
        assert_eq!(contributed_as(&property), (FeatureType::Property, None));
        assert_eq!(
            contributed_as(&MethodDescriptor::new("act")),
            (FeatureType::Action, None)
        );

        let conflicting = property.annotated(Annotation::new(annotation::ACTION));
        let (feature_type, conflict) = contributed_as(&conflicting);
        assert_eq!(feature_type, FeatureType::Action);
        assert!(conflict.is_some_and(|message| message.contains("conflicting")));
    }

    #[test]
    fn property_editing_and_optionality() {
        let class = view_model("dom.Customer").method(
            MethodDescriptor::new("getNotes").returning("java.lang.String").annotated(
                Annotation::new(annotation::PROPERTY)
                    .with("editing", "ENABLED")
                    .with("optionality", "OPTIONAL"),
            ),
        );
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::E1MemberModelling, || AccessorFacetFactory, &[])
            .expect("registers");
        model
            .add_factory(
                ProcessingOrder::E1MemberModelling,
                || PropertyAnnotationFacetFactory,
                &[],
            )
            .expect("registers");
        let spec = introspect_in(model, class);
        let notes = spec.member("notes").expect("notes property");
        let disabled = notes.get_facet(facet_type::DISABLED).expect("editing");
        assert_eq!(disabled.as_flag(), Some(false));
        assert_eq!(disabled.precedence(), Precedence::Explicit);
        assert_eq!(
            notes.get_facet(facet_type::MANDATORY).and_then(Facet::as_flag),
            Some(false)
        );
        assert_eq!(
            notes
                .get_facet(facet_type::PROPERTY_DOMAIN_EVENT)
                .and_then(Facet::as_text),
            Some(DEFAULT_PROPERTY_DOMAIN_EVENT)
        );
    }

    #[test]
    fn broken_regex_pattern_is_a_metadata_error() {
        let class = view_model("dom.Customer").method(
            MethodDescriptor::new("changeEmail").param(
                ParameterDescriptor::new("email", "java.lang.String").annotated(
                    Annotation::new(annotation::PARAMETER)
                        .with("regexPattern", "[a-z+@")
                        .with("optionality", "OPTIONAL"),
                ),
            ),
        );
        let spec = introspect_with(|| ParameterAnnotationFacetFactory, class);
        let email = &spec.member("changeEmail").expect("action").parameters()[0];
        assert_eq!(email.metadata_errors().len(), 1);
        assert!(email.metadata_errors()[0].starts_with("@Parameter(regexPattern) '[a-z+@'"));
        assert_eq!(
            email.get_facet(facet_type::MANDATORY).and_then(Facet::as_flag),
            Some(false)
        );
    }
}
