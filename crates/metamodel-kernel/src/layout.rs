//! Layout data derived from a specification.
//!
//! Attributes are emitted only when a facet other than a framework fallback
//! is present, so a generated layout records what was actually configured.

use crate::facet::{Facet, FacetType, facet_type};
use crate::feature::FeatureType;
use crate::holder::FacetHolder;
use crate::spec::{FacetedMethod, FacetedMethodParameter, ObjectSpecification};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterLayoutData {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLayoutData {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class_fa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_in_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterLayoutData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLayout {
    pub type_name: String,
    pub logical_type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class_fa: Option<String>,
    pub properties: Vec<MemberLayoutData>,
    pub collections: Vec<MemberLayoutData>,
    pub actions: Vec<MemberLayoutData>,
}

fn configured_text(holder: &impl FacetHolder, facet_type: FacetType) -> Option<String> {
    holder
        .lookup_non_fallback_facet(facet_type)
        .and_then(Facet::as_text)
        .map(str::to_string)
}

fn metadata_error(holder: &impl FacetHolder) -> Option<String> {
    let errors = holder.metadata_errors();
    (!errors.is_empty()).then(|| errors.join("; "))
}

fn parameter_layout(parameter: &FacetedMethodParameter) -> ParameterLayoutData {
    ParameterLayoutData {
        index: parameter.index(),
        named: configured_text(parameter, facet_type::NAMED),
        described_as: configured_text(parameter, facet_type::DESCRIBED_AS),
        metadata_error: metadata_error(parameter),
    }
}

fn member_layout(member: &FacetedMethod) -> MemberLayoutData {
    MemberLayoutData {
        id: member.name().to_string(),
        named: configured_text(member, facet_type::NAMED),
        described_as: configured_text(member, facet_type::DESCRIBED_AS),
        css_class_fa: configured_text(member, facet_type::CSS_CLASS_FA),
        sequence: configured_text(member, facet_type::MEMBER_ORDER),
        hidden: member
            .lookup_non_fallback_facet(facet_type::HIDDEN)
            .and_then(Facet::as_flag)
            .unwrap_or(false),
        mixed_in_from: member.mixed_in_from().map(str::to_string),
        metadata_error: metadata_error(member),
        parameters: member.parameters().iter().map(parameter_layout).collect(),
    }
}

/// Dewey-decimal comparison of member order sequences: `1.2 < 1.10 < 2`.
pub fn compare_sequence(a: &str, b: &str) -> Ordering {
    let parts = |sequence: &str| -> Vec<u64> {
        sequence
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(u64::MAX))
            .collect()
    };
    parts(a).cmp(&parts(b)).then_with(|| a.cmp(b))
}

/// Sequenced members first in sequence order, then the rest in declaration order.
fn sort_by_sequence(members: &mut [MemberLayoutData]) {
    members.sort_by(|a, b| match (&a.sequence, &b.sequence) {
        (Some(x), Some(y)) => compare_sequence(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

impl ObjectLayout {
    pub fn for_spec(spec: &ObjectSpecification) -> Self {
        let of_kind = |feature_type: FeatureType| {
            let mut members: Vec<MemberLayoutData> = spec
                .members()
                .iter()
                .filter(|member| member.feature_type() == feature_type)
                .map(member_layout)
                .collect();
            sort_by_sequence(&mut members);
            members
        };
        Self {
            type_name: spec.type_name().to_string(),
            logical_type_name: spec.logical_type_name().to_string(),
            named: configured_text(spec, facet_type::NAMED),
            css_class_fa: configured_text(spec, facet_type::CSS_CLASS_FA),
            properties: of_kind(FeatureType::Property),
            collections: of_kind(FeatureType::Collection),
            actions: of_kind(FeatureType::Action),
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberLayoutData> {
        self.properties
            .iter()
            .chain(&self.collections)
            .chain(&self.actions)
    }

    /// Plain-text rendering, one line per member.
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("{} ({})", self.type_name, self.logical_type_name)];
        let sections = [
            ("properties", &self.properties),
            ("collections", &self.collections),
            ("actions", &self.actions),
        ];
        for (label, members) in sections {
            if members.is_empty() {
                continue;
            }
            lines.push(format!("  {label}:"));
            for member in members {
                let mut line = format!("    - {}", member.id);
                if let Some(sequence) = &member.sequence {
                    line.push_str(&format!(" [{sequence}]"));
                }
                if let Some(named) = &member.named {
                    line.push_str(&format!(" named={named:?}"));
                }
                if let Some(css) = &member.css_class_fa {
                    line.push_str(&format!(" cssClassFa={css}"));
                }
                if member.hidden {
                    line.push_str(" hidden");
                }
                if let Some(mixin) = &member.mixed_in_from {
                    line.push_str(&format!(" mixin={mixin}"));
                }
                if let Some(error) = &member.metadata_error {
                    line.push_str(&format!(" error={error:?}"));
                }
                lines.push(line);
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean_sort::BeanSort;
    use crate::descriptor::{ClassDescriptor, MethodDescriptor};
    use crate::facet::{FacetValue, Precedence};

    fn text(facet_type: FacetType, precedence: Precedence, value: &str) -> Facet {
        Facet::new(facet_type, precedence, FacetValue::Text(value.into()))
    }

    fn customer() -> ObjectSpecification {
        let mut spec =
            ObjectSpecification::new(ClassDescriptor::new("dom.Customer"), BeanSort::Entity);
        let mut name = FacetedMethod::for_association(
            "dom.Customer",
            MethodDescriptor::new("getName").returning("java.lang.String"),
            FeatureType::Property,
        );
        name.add_facet(text(facet_type::CSS_CLASS_FA, Precedence::Fallback, "fa-cube"));
        name.add_facet(text(facet_type::MEMBER_ORDER, Precedence::Explicit, "2"));
        let mut email = FacetedMethod::for_association(
            "dom.Customer",
            MethodDescriptor::new("getEmail").returning("java.lang.String"),
            FeatureType::Property,
        );
        email.add_facet(text(facet_type::CSS_CLASS_FA, Precedence::Explicit, "fa-at"));
        email.add_facet(text(facet_type::MEMBER_ORDER, Precedence::Explicit, "1.10"));
        let notes = FacetedMethod::for_association(
            "dom.Customer",
            MethodDescriptor::new("getNotes").returning("java.lang.String"),
            FeatureType::Property,
        );
        spec.add_member(notes);
        spec.add_member(name);
        spec.add_member(email);
        spec
    }

    #[test]
    fn fallback_facets_are_not_emitted() {
        let layout = ObjectLayout::for_spec(&customer());
        let name = layout.members().find(|m| m.id == "name").expect("name member");
        assert_eq!(name.css_class_fa, None);
        let email = layout.members().find(|m| m.id == "email").expect("email member");
        assert_eq!(email.css_class_fa.as_deref(), Some("fa-at"));
    }

    #[test]
    fn members_follow_dewey_sequence() {
        let layout = ObjectLayout::for_spec(&customer());
        let ids: Vec<&str> = layout.properties.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["email", "name", "notes"]);
        assert_eq!(compare_sequence("1.2", "1.10"), Ordering::Less);
        assert_eq!(compare_sequence("2", "1.10"), Ordering::Greater);
    }

    #[test]
    fn text_rendering() {
        let layout = ObjectLayout::for_spec(&customer());
        insta::assert_snapshot!(layout.render_text(), @r"
        dom.Customer (dom.Customer)
          properties:
            - email [1.10] cssClassFa=fa-at
            - name [2]
            - notes
        ");
    }
}
