//! Metamodel configuration, loaded from TOML.
//!
//! ```toml
//! [programming-model]
//! excluded-markers = ["deprecated"]
//! introspection-policy = "annotation-required"
//!
//! [validation]
//! action-overloading = false
//! ```

use crate::error::ConfigError;
use crate::programming_model::{Marker, ProgrammingModelInitFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Which public methods become actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
    /// Every public, non-support method is an action.
    #[default]
    AnnotationOptional,
    /// Only methods annotated with `@Action` are actions.
    AnnotationRequired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProgrammingModelConfig {
    /// Factories, validators and post-processors carrying any of these markers are skipped.
    pub excluded_markers: BTreeSet<Marker>,
    pub introspection_policy: IntrospectionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidationConfig {
    pub action_overloading: bool,
    pub concrete_type_actions: bool,
    pub unique_logical_types: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            action_overloading: true,
            concrete_type_actions: true,
            unique_logical_types: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MetamodelConfig {
    pub programming_model: ProgrammingModelConfig,
    pub validation: ValidationConfig,
}

impl MetamodelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn init_filter(&self) -> ProgrammingModelInitFilter {
        ProgrammingModelInitFilter::excluding(
            self.programming_model.excluded_markers.iter().copied(),
        )
    }
}
