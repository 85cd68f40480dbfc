//! Facets and the precedence model that decides which facet stays active.
//!
//! A holder keeps one facet per [`FacetType`]. When a second facet of the
//! same type arrives, [`resolve`] decides the outcome from the two
//! precedences alone: the incoming facet wins when its precedence is not
//! lower than the existing one. Ties go to the later facet, so a factory
//! running in a later phase overrides an earlier one of equal rank.

use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the behavioural question a facet answers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FacetType(&'static str);

impl FacetType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FacetType({})", self.0)
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Facet types the kernel itself reads. Programming models may define more.
pub mod facet_type {
    use super::FacetType;

    pub const NAMED: FacetType = FacetType::new("named");
    pub const DESCRIBED_AS: FacetType = FacetType::new("described_as");
    pub const HIDDEN: FacetType = FacetType::new("hidden");
    pub const DISABLED: FacetType = FacetType::new("disabled");
    pub const CSS_CLASS_FA: FacetType = FacetType::new("css_class_fa");
    pub const LOGICAL_TYPE: FacetType = FacetType::new("logical_type");
    pub const IMMUTABLE: FacetType = FacetType::new("immutable");
    pub const VALUE: FacetType = FacetType::new("value");
    pub const MANDATORY: FacetType = FacetType::new("mandatory");
    pub const MEMBER_ORDER: FacetType = FacetType::new("member_order");

    pub const ACTION_DOMAIN_EVENT: FacetType = FacetType::new("action_domain_event");
    pub const PROPERTY_DOMAIN_EVENT: FacetType = FacetType::new("property_domain_event");
    pub const COLLECTION_DOMAIN_EVENT: FacetType = FacetType::new("collection_domain_event");
    pub const OBJECT_ACTION_DOMAIN_EVENT: FacetType =
        FacetType::new("object_action_domain_event");
    pub const OBJECT_PROPERTY_DOMAIN_EVENT: FacetType =
        FacetType::new("object_property_domain_event");

    pub const ACTION_INVOCATION: FacetType = FacetType::new("action_invocation");
    pub const ACTION_SEMANTICS: FacetType = FacetType::new("action_semantics");
    pub const PROPERTY_ACCESSOR: FacetType = FacetType::new("property_accessor");
    pub const PROPERTY_SETTER: FacetType = FacetType::new("property_setter");
    pub const COLLECTION_ACCESSOR: FacetType = FacetType::new("collection_accessor");

    pub const HIDE_FOR_CONTEXT: FacetType = FacetType::new("hide_for_context");
    pub const DISABLE_FOR_CONTEXT: FacetType = FacetType::new("disable_for_context");
    pub const VALIDATE: FacetType = FacetType::new("validate");
    pub const DEFAULTS: FacetType = FacetType::new("defaults");
    pub const CHOICES: FacetType = FacetType::new("choices");

    /// Which member kind a mixin main method contributes to its mixee.
    pub const CONTRIBUTING: FacetType = FacetType::new("contributing");
}

/// Rank deciding whether a facet may replace another of the same type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Framework default installed before anything else ran.
    Fallback,
    /// Programming-model default for a member kind.
    Default,
    /// Derived from other facets or from conventions.
    Inferred,
    /// Declared by the developer through an annotation or supporting method.
    Explicit,
}

impl Precedence {
    pub fn is_fallback(self) -> bool {
        self == Precedence::Fallback
    }
}

/// Which invocation variant an action facet drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationKind {
    ForAction,
    ForMixedInPropertyOrCollection,
}

/// Facet payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FacetValue {
    Marker,
    Flag(bool),
    Text(String),
    TypeName(String),
    Method(String),
    Methods(Vec<String>),
    Invocation { method: String, kind: InvocationKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    facet_type: FacetType,
    holder: Option<Identifier>,
    precedence: Precedence,
    value: FacetValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata_error: Option<String>,
}

impl Facet {
    /// A facet not yet bound to a holder; [`crate::holder::FacetMap::add`] binds it.
    pub fn new(facet_type: FacetType, precedence: Precedence, value: FacetValue) -> Self {
        Self {
            facet_type,
            holder: None,
            precedence,
            value,
            metadata_error: None,
        }
    }

    pub fn marker(facet_type: FacetType, precedence: Precedence) -> Self {
        Self::new(facet_type, precedence, FacetValue::Marker)
    }

    /// Attach a diagnostic describing malformed metadata on this member.
    pub fn with_metadata_error(mut self, message: impl Into<String>) -> Self {
        self.metadata_error = Some(message.into());
        self
    }

    pub(crate) fn bind(&mut self, holder: &Identifier) {
        self.holder = Some(holder.clone());
    }

    pub fn facet_type(&self) -> FacetType {
        self.facet_type
    }

    /// Identifier of the holder this facet is attached to.
    pub fn holder(&self) -> Option<&Identifier> {
        self.holder.as_ref()
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn value(&self) -> &FacetValue {
        &self.value
    }

    pub fn metadata_error(&self) -> Option<&str> {
        self.metadata_error.as_deref()
    }

    pub fn is_fallback(&self) -> bool {
        self.precedence.is_fallback()
    }

    pub fn as_flag(&self) -> Option<bool> {
        match &self.value {
            FacetValue::Flag(flag) => Some(*flag),
            FacetValue::Marker => Some(true),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FacetValue::Text(text) | FacetValue::TypeName(text) | FacetValue::Method(text) => {
                Some(text)
            }
            _ => None,
        }
    }

    pub fn as_invocation(&self) -> Option<(&str, InvocationKind)> {
        match &self.value {
            FacetValue::Invocation { method, kind } => Some((method, *kind)),
            _ => None,
        }
    }
}

/// Outcome of offering a facet to a holder slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The slot was empty.
    Installed,
    /// The incoming facet displaced one of lower or equal precedence.
    Replaced { previous: Precedence },
    /// The existing facet outranks the incoming one; nothing changed.
    Rejected { existing: Precedence },
}

impl Resolution {
    pub fn is_accepted(self) -> bool {
        !matches!(self, Resolution::Rejected { .. })
    }
}

/// Decides the outcome of adding a facet of precedence `incoming` to a slot
/// currently holding `existing`.
pub fn resolve(existing: Option<Precedence>, incoming: Precedence) -> Resolution {
    match existing {
        None => Resolution::Installed,
        Some(previous) if incoming >= previous => Resolution::Replaced { previous },
        Some(existing) => Resolution::Rejected { existing },
    }
}

/// The facet that stays active after offering `incoming` to a slot holding `existing`.
pub fn merge<'a>(existing: Option<&'a Facet>, incoming: &'a Facet) -> &'a Facet {
    match (existing, resolve(existing.map(Facet::precedence), incoming.precedence())) {
        (Some(current), Resolution::Rejected { .. }) => current,
        _ => incoming,
    }
}
