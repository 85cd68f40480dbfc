//! Stable identifiers for metamodel elements.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Class,
    PropertyOrCollection,
    Action,
    ActionParameter,
}

/// Identifies a class, a member of a class, or a parameter of an action.
///
/// The full identity string has the form `Type`, `Type#member`,
/// `Type#action(ParamType,..)` or `Type#action(ParamType,..)[index]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    kind: IdentifierKind,
    class_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    member_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameter_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter_index: Option<usize>,
}

impl Identifier {
    pub fn class_identifier(class_name: impl Into<String>) -> Self {
        Self {
            kind: IdentifierKind::Class,
            class_name: class_name.into(),
            member_name: String::new(),
            parameter_types: Vec::new(),
            parameter_index: None,
        }
    }

    pub fn property_or_collection_identifier(
        class_name: impl Into<String>,
        member_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: IdentifierKind::PropertyOrCollection,
            class_name: class_name.into(),
            member_name: member_name.into(),
            parameter_types: Vec::new(),
            parameter_index: None,
        }
    }

    pub fn action_identifier(
        class_name: impl Into<String>,
        member_name: impl Into<String>,
        parameter_types: Vec<String>,
    ) -> Self {
        Self {
            kind: IdentifierKind::Action,
            class_name: class_name.into(),
            member_name: member_name.into(),
            parameter_types,
            parameter_index: None,
        }
    }

    /// Identifier of parameter `index` of this action.
    pub fn parameter_identifier(&self, index: usize) -> Self {
        Self {
            kind: IdentifierKind::ActionParameter,
            parameter_index: Some(index),
            ..self.clone()
        }
    }

    /// The same member relocated onto another class (used for mixed-in members).
    pub fn with_class(&self, class_name: impl Into<String>, member_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            member_name: member_name.into(),
            ..self.clone()
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Member name as shown to users, independent of parameter types.
    pub fn logical_member_name(&self) -> &str {
        &self.member_name
    }

    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    pub fn parameter_index(&self) -> Option<usize> {
        self.parameter_index
    }

    pub fn full_identity_string(&self) -> String {
        match self.kind {
            IdentifierKind::Class => self.class_name.clone(),
            IdentifierKind::PropertyOrCollection => {
                format!("{}#{}", self.class_name, self.member_name)
            }
            IdentifierKind::Action => format!(
                "{}#{}({})",
                self.class_name,
                self.member_name,
                self.parameter_types.join(",")
            ),
            IdentifierKind::ActionParameter => format!(
                "{}#{}({})[{}]",
                self.class_name,
                self.member_name,
                self.parameter_types.join(","),
                self.parameter_index.unwrap_or_default()
            ),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_identity_string())
    }
}
