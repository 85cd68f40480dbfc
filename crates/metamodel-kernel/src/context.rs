//! Explicit context handed to the loader, the processor and every factory.
//!
//! There is no process-wide registry: whatever a factory needs beyond its
//! process context is reachable from the [`MetaModelContext`] it is given.

use crate::config::MetamodelConfig;
use std::collections::BTreeSet;

/// Type names treated as values without needing a `@Value` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTypeRegistry {
    types: BTreeSet<String>,
}

const BUILTIN_VALUE_TYPES: &[&str] = &[
    "boolean",
    "byte",
    "char",
    "double",
    "float",
    "int",
    "long",
    "short",
    "java.lang.Boolean",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.String",
    "java.math.BigDecimal",
    "java.math.BigInteger",
    "java.time.LocalDate",
    "java.time.LocalDateTime",
    "java.time.OffsetDateTime",
    "java.util.UUID",
];

impl Default for ValueTypeRegistry {
    fn default() -> Self {
        Self {
            types: BUILTIN_VALUE_TYPES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ValueTypeRegistry {
    pub fn empty() -> Self {
        Self {
            types: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, type_name: impl Into<String>) -> bool {
        self.types.insert(type_name.into())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetaModelContext {
    config: MetamodelConfig,
    value_types: ValueTypeRegistry,
}

impl MetaModelContext {
    pub fn new(config: MetamodelConfig) -> Self {
        Self {
            config,
            value_types: ValueTypeRegistry::default(),
        }
    }

    pub fn with_value_types(mut self, value_types: ValueTypeRegistry) -> Self {
        self.value_types = value_types;
        self
    }

    pub fn config(&self) -> &MetamodelConfig {
        &self.config
    }

    pub fn value_types(&self) -> &ValueTypeRegistry {
        &self.value_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_value_types_are_registered() {
        let context = MetaModelContext::default();
        assert!(context.value_types().contains("java.lang.String"));
        assert!(!context.value_types().contains("dom.Customer"));
    }

    #[test]
    fn custom_value_types_extend_the_registry() {
        let mut registry = ValueTypeRegistry::empty();
        assert!(registry.register("dom.Money"));
        assert!(!registry.register("dom.Money"));
        let context = MetaModelContext::default().with_value_types(registry);
        assert!(context.value_types().contains("dom.Money"));
        assert!(!context.value_types().contains("int"));
    }
}
