//! The standard programming model end to end over tests/fixtures/shop_model.json.

use metamodel_kernel::{
    ClassDescriptor, Facet, FacetHolder, FacetType, FeatureType, InvocationKind, MetaModelContext,
    Metamodel, MetamodelConfig, Precedence, facet_type, failure_class,
};
use metamodel_progmodel::{DEFAULT_ACTION_DOMAIN_EVENT, standard_loader};
use std::path::PathBuf;

fn load_classes(name: &str) -> Vec<ClassDescriptor> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

fn build(config: MetamodelConfig) -> Metamodel {
    let mut loader = standard_loader(MetaModelContext::new(config))
        .unwrap_or_else(|e| panic!("standard loader initializes: {e}"));
    loader
        .load(&load_classes("shop_model.json"))
        .unwrap_or_else(|e| panic!("shop model loads: {e}"))
}

fn text_of(holder: &impl FacetHolder, facet_type: FacetType) -> Option<&str> {
    holder.get_facet(facet_type).and_then(Facet::as_text)
}

#[test]
fn members_are_classified_and_support_methods_claimed() {
    let metamodel = build(MetamodelConfig::default());
    let customer = metamodel.spec("dom.Customer").expect("customer spec");

    let properties: Vec<&str> = customer.properties().map(|member| member.name()).collect();
    let collections: Vec<&str> = customer.collections().map(|member| member.name()).collect();
    let actions: Vec<&str> = customer.actions().map(|member| member.name()).collect();
    assert_eq!(properties, vec!["name", "email", "notes"]);
    assert_eq!(collections, vec!["orders"]);
    assert_eq!(actions, vec!["placeOrder", "archive", "archive", "block"]);

    let email = customer.member("email").expect("email");
    assert_eq!(text_of(email, facet_type::HIDE_FOR_CONTEXT), Some("hideEmail"));
    assert_eq!(
        email.get_facet(facet_type::DISABLED).and_then(Facet::as_flag),
        Some(true)
    );
    let name = customer.member("name").expect("name");
    assert_eq!(text_of(name, facet_type::PROPERTY_SETTER), Some("setName"));

    let place_order = customer.member("placeOrder").expect("placeOrder");
    assert_eq!(text_of(place_order, facet_type::VALIDATE), Some("validatePlaceOrder"));
    assert_eq!(text_of(place_order, facet_type::ACTION_SEMANTICS), Some("IDEMPOTENT"));
    let parameters = place_order.parameters();
    assert_eq!(text_of(&parameters[0], facet_type::CHOICES), Some("choices0PlaceOrder"));
    assert_eq!(text_of(&parameters[1], facet_type::NAMED), Some("Quantity"));
    assert_eq!(
        parameters[1].get_facet(facet_type::MANDATORY).and_then(Facet::as_flag),
        Some(true)
    );
}

#[test]
fn mixins_contribute_to_their_mixee() {
    let metamodel = build(MetamodelConfig::default());
    let customer = metamodel.spec("dom.Customer").expect("customer spec");

    let notes = customer.member("notes").expect("notes");
    assert_eq!(notes.feature_type(), FeatureType::Property);
    assert_eq!(notes.mixed_in_from(), Some("dom.Customer_notes"));
    assert_eq!(notes.identifier().to_string(), "dom.Customer#notes");
    assert_eq!(text_of(notes, facet_type::NAMED), Some("Notes"));
    assert_eq!(
        notes
            .get_facet(facet_type::ACTION_INVOCATION)
            .and_then(Facet::as_invocation),
        Some(("act", InvocationKind::ForMixedInPropertyOrCollection))
    );

    let block = customer.member("block").expect("block");
    assert_eq!(block.feature_type(), FeatureType::Action);
    assert_eq!(block.identifier().to_string(), "dom.Customer#block()");
}

#[test]
fn object_level_facets_cascade_to_members() {
    let metamodel = build(MetamodelConfig::default());

    let order = metamodel.spec("dom.Order").expect("order spec");
    let disabled = |member: &str| {
        order
            .member(member)
            .and_then(|member| member.get_facet(facet_type::DISABLED))
            .and_then(Facet::as_flag)
    };
    assert_eq!(disabled("number"), Some(true));
    assert_eq!(disabled("note"), Some(false));

    let customer = metamodel.spec("dom.Customer").expect("customer spec");
    let event = |member: &str| {
        customer
            .member(member)
            .and_then(|member| text_of(member, facet_type::ACTION_DOMAIN_EVENT))
    };
    assert_eq!(event("placeOrder"), Some("dom.CustomerActionEvent"));
    assert_eq!(event("block"), Some(DEFAULT_ACTION_DOMAIN_EVENT));
}

#[test]
fn every_failure_is_reported_in_one_pass() {
    let metamodel = build(MetamodelConfig::default());
    let report = metamodel.report();
    assert!(!report.is_accepted());
    assert_eq!(
        report.failure_classes,
        vec![
            failure_class::ACTION_ON_UNKNOWN_TYPE,
            failure_class::ACTION_OVERLOADING,
            failure_class::LOGICAL_TYPE_COLLISION,
            failure_class::METADATA_ERROR,
        ]
    );
    let paths: Vec<&str> = report.issues.iter().map(|issue| issue.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "dom.Customer",
            "dom.Customer#archive()",
            "dom.Helper#recalculate(int)",
            "dom.LegacyCustomer",
            "dom.Order#cancel()",
        ]
    );
    assert_eq!(
        report.issues[4].message,
        "@Action(semantics) has unknown value 'RISKY'"
    );
}

#[test]
fn malformed_annotations_reject_the_model_even_when_outranked() {
    let mut loader = standard_loader(MetaModelContext::default())
        .unwrap_or_else(|e| panic!("standard loader initializes: {e}"));
    let metamodel = loader
        .load(&load_classes("malformed_model.json"))
        .unwrap_or_else(|e| panic!("malformed model loads: {e}"));

    // the slots keep the facets that outrank the malformed ones
    let note = metamodel.spec("dom.Note").expect("note spec");
    let name = note.member("name").expect("name");
    assert_eq!(
        name.get_facet(facet_type::MANDATORY).map(Facet::precedence),
        Some(Precedence::Default)
    );
    let rename = note.member("rename").expect("rename");
    assert_eq!(text_of(rename, facet_type::MEMBER_ORDER), Some("1"));

    let report = metamodel.report();
    assert!(!report.is_accepted());
    assert_eq!(report.failure_classes, vec![failure_class::METADATA_ERROR]);
    let issues: Vec<(&str, &str)> = report
        .issues
        .iter()
        .map(|issue| (issue.path.as_str(), issue.message.as_str()))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("dom.Money", "@DomainObject(editing) has unknown value 'SOMETIMES'"),
            ("dom.Note#name", "@Property(optionality) has unknown value 'MAYBE'"),
            ("dom.Note#notes", "@Property(editing) has unknown value 'SOMETIMES'"),
            ("dom.Note#rename(java.lang.String)", "@MemberOrder has no sequence"),
            (
                "dom.Note#rename(java.lang.String)[0]",
                "@Parameter(optionality) has unknown value 'MAYBE'"
            ),
        ]
    );

    let layout = metamodel.layout("dom.Note").expect("note layout");
    let notes = layout
        .properties
        .iter()
        .find(|member| member.id == "notes")
        .expect("notes layout");
    assert_eq!(
        notes.metadata_error.as_deref(),
        Some("@Property(editing) has unknown value 'SOMETIMES'")
    );

    let exported = metamodel.to_json();
    assert_eq!(exported["specifications"][0]["identifier"]["className"], "dom.Money");
    assert_eq!(
        exported["specifications"][0]["metadataErrors"],
        serde_json::json!(["@DomainObject(editing) has unknown value 'SOMETIMES'"])
    );
}

#[test]
fn validators_can_be_switched_off() {
    let config = MetamodelConfig::from_toml_str(
        r#"
        [validation]
        action-overloading = false
        concrete-type-actions = false
        unique-logical-types = false
        "#,
    )
    .expect("config parses");
    let report = build(config).report();
    assert_eq!(report.failure_classes, vec![failure_class::METADATA_ERROR]);
}

#[test]
fn excluding_deprecated_drops_member_order_annotations() {
    let cancel_sequence = |metamodel: &Metamodel| {
        metamodel
            .spec("dom.Order")
            .and_then(|order| order.member("cancel"))
            .and_then(|cancel| text_of(cancel, facet_type::MEMBER_ORDER))
            .map(str::to_string)
    };
    assert_eq!(
        cancel_sequence(&build(MetamodelConfig::default())).as_deref(),
        Some("3")
    );

    let config = MetamodelConfig::from_toml_str(
        "[programming-model]\nexcluded-markers = [\"deprecated\"]\n",
    )
    .expect("config parses");
    assert_eq!(cancel_sequence(&build(config)), None);
}

#[test]
fn loading_is_deterministic() {
    let first = build(MetamodelConfig::default());
    let second = build(MetamodelConfig::default());
    assert_eq!(first.digest(), second.digest());
    assert_eq!(first.facet_count(), second.facet_count());
    assert_eq!(
        first.spec_by_logical_type("shop.Customer").map(|spec| spec.type_name()),
        Some("dom.Customer")
    );
}

#[test]
fn customer_layout() {
    let metamodel = build(MetamodelConfig::default());
    let layout = metamodel.layout("dom.Customer").expect("customer layout");
    assert_eq!(layout.css_class_fa.as_deref(), Some("fa-user"));
    insta::assert_snapshot!(layout.render_text(), @r#"
    dom.Customer (shop.Customer)
      properties:
        - email [2] named="E-mail"
        - name
        - notes named="Notes" mixin=dom.Customer_notes
      collections:
        - orders cssClassFa=fa-list
      actions:
        - placeOrder [1]
        - archive
        - archive
        - block mixin=dom.Customer_block
    "#);
}
