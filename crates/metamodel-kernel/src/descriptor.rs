//! Reflective input: classes, methods, parameters and their annotations.
//!
//! The pipeline never scans for classes itself. The bootstrap layer hands it
//! one [`ClassDescriptor`] at a time, typically deserialized from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known annotation names.
pub mod annotation {
    pub const ACTION: &str = "Action";
    pub const ACTION_LAYOUT: &str = "ActionLayout";
    pub const COLLECTION: &str = "Collection";
    pub const COLLECTION_LAYOUT: &str = "CollectionLayout";
    pub const DOMAIN_OBJECT: &str = "DomainObject";
    pub const DOMAIN_OBJECT_LAYOUT: &str = "DomainObjectLayout";
    pub const DOMAIN_SERVICE: &str = "DomainService";
    pub const MEMBER_ORDER: &str = "MemberOrder";
    pub const MIXIN: &str = "Mixin";
    pub const PARAMETER: &str = "Parameter";
    pub const PARAMETER_LAYOUT: &str = "ParameterLayout";
    pub const PROGRAMMATIC: &str = "Programmatic";
    pub const PROPERTY: &str = "Property";
    pub const PROPERTY_LAYOUT: &str = "PropertyLayout";
    pub const VALUE: &str = "Value";
}

/// A (possibly generic) type name such as `java.util.List<dom.Order>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

const COLLECTION_RAW_TYPES: &[&str] = &[
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
    "java.util.SortedSet",
    "java.lang.Iterable",
];

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn void() -> Self {
        Self("void".to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Type name with generic arguments stripped.
    pub fn raw_name(&self) -> &str {
        self.0.split('<').next().unwrap_or(&self.0).trim()
    }

    pub fn is_void(&self) -> bool {
        matches!(self.raw_name(), "void" | "java.lang.Void")
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.raw_name(), "boolean" | "java.lang.Boolean")
    }

    pub fn is_string(&self) -> bool {
        self.raw_name() == "java.lang.String"
    }

    pub fn is_collection(&self) -> bool {
        self.0.ends_with("[]") || COLLECTION_RAW_TYPES.contains(&self.raw_name())
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::void()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Non-empty, trimmed string attribute.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key).and_then(Value::as_bool)
    }
}

fn find_annotation<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.name == name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: TypeRef::new(type_ref),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, name)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub return_type: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::void(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            is_static: false,
            is_public: true,
        }
    }

    pub fn returning(mut self, type_ref: impl Into<String>) -> Self {
        self.return_type = TypeRef::new(type_ref);
        self
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_types(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|parameter| parameter.type_ref.name().to_string())
            .collect()
    }

    /// Methods are identified by name plus parameter types.
    pub fn same_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.type_ref == b.type_ref)
    }

    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameter_types().join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Name after the last package separator.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// `(mixee type, main method name)` when this class is a mixin.
    pub fn mixin(&self) -> Option<(&str, &str)> {
        let mixin = self.annotation(annotation::MIXIN)?;
        let mixee = mixin.attr_str("mixee")?;
        Some((mixee, mixin.attr_str("method").unwrap_or("act")))
    }
}
