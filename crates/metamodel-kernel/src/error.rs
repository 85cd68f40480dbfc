//! Error types for metamodel construction.
//!
//! Only programming-model defects and registry misuse are errors. Malformed
//! domain metadata is recorded on facets and semantic problems are collected
//! as [`crate::validation::ValidationFailure`]s; neither aborts the build.

/// Fatal errors raised while registering, initialising or running the
/// metamodel pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MetamodelError {
    /// An `add_*` or `init` call reached a programming model that is already frozen.
    #[error("programming model is already initialized; cannot {operation}")]
    ProgrammingModelFrozen { operation: &'static str },

    /// The same factory type was registered twice.
    #[error("facet factory {factory} is already registered")]
    DuplicateFactory { factory: &'static str },

    /// The facet processor was used against a programming model that was never initialized.
    #[error("programming model has not been initialized")]
    ProgrammingModelNotInitialized,

    /// A class was handed to the loader twice in one load.
    #[error("class {0} was introspected more than once")]
    DuplicateSpecification(String),

    /// A facet factory failed. This is a defect in the factory, not in the domain model.
    #[error("facet factory {factory} failed on {identifier}: {reason}")]
    Factory {
        factory: &'static str,
        identifier: String,
        reason: String,
    },

    /// A post-processor failed on a fully introspected specification.
    #[error("post-processor {processor} failed on {type_name}: {reason}")]
    PostProcessor {
        processor: &'static str,
        type_name: String,
        reason: String,
    },
}

impl MetamodelError {
    pub fn factory(
        factory: &'static str,
        identifier: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Factory {
            factory,
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }

    pub fn post_processor(
        processor: &'static str,
        type_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PostProcessor {
            processor,
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors loading a [`crate::config::MetamodelConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Strips the module path from `std::any::type_name` output.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
