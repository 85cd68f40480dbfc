//! # Metamodel Kernel
//!
//! The facet-processing pipeline that turns reflective class descriptors into
//! a read-only metamodel: one [`ObjectSpecification`] per class, each member
//! and parameter carrying the [`Facet`]s that describe its behaviour.
//!
//! The kernel ships no concrete facet factories. A programming model crate
//! registers them, in phase order, on a [`ProgrammingModel`].
//!
//! ## Architecture
//!
//! ```text
//! ProgrammingModel      ← Ordered, filtered, frozen-once registry
//!     │
//! FacetProcessor        ← Per-feature-type dispatch over cached tables
//!     │
//! FacetFactory          ← Contributes facets to a class, member or parameter
//!     │
//! FacetHolder           ← One active facet per type, resolved by Precedence
//!     │
//! SpecificationLoader   ← Introspection, mixins, post-processing
//!     │
//! ValidatorComposite    ← Aggregated, non-fail-fast validation
//! ```

pub mod bean_sort;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod facet;
pub mod factory;
pub mod feature;
pub mod fingerprint;
pub mod holder;
pub mod identifier;
pub mod layout;
pub mod loader;
pub mod metamodel;
pub mod method_pool;
pub mod naming;
pub mod post_process;
pub mod processor;
pub mod programming_model;
pub mod spec;
pub mod validation;

pub use bean_sort::BeanSort;
pub use config::{IntrospectionPolicy, MetamodelConfig, ProgrammingModelConfig, ValidationConfig};
pub use context::{MetaModelContext, ValueTypeRegistry};
pub use descriptor::{Annotation, ClassDescriptor, MethodDescriptor, ParameterDescriptor, TypeRef};
pub use error::{ConfigError, MetamodelError};
pub use facet::{
    Facet, FacetType, FacetValue, InvocationKind, Precedence, Resolution, facet_type, merge,
    resolve,
};
pub use factory::{
    Capabilities, FacetFactory, MetaModelRefiner, MethodFilteringFacetFactory, MethodRemover,
    ObjectSpecIdFacetFactory, ProcessClassContext, ProcessMethodContext, ProcessParameterContext,
    PropertyOrCollectionIdentifyingFacetFactory,
};
pub use feature::{FeatureType, FeatureTypes};
pub use holder::{FacetHolder, FacetMap};
pub use identifier::{Identifier, IdentifierKind};
pub use layout::{MemberLayoutData, ObjectLayout, ParameterLayoutData};
pub use loader::SpecificationLoader;
pub use metamodel::Metamodel;
pub use method_pool::MethodPool;
pub use post_process::ObjectSpecificationPostProcessor;
pub use processor::FacetProcessor;
pub use programming_model::{
    ActiveFactory, Marker, ProcessingOrder, ProgrammingModel, ProgrammingModelInitFilter,
    Registration, RegistrationKind,
};
pub use spec::{FacetedMethod, FacetedMethodParameter, ObjectSpecification};
pub use validation::{
    MetaModelValidator, MetadataErrorValidator, ValidationFailure, ValidationFailures,
    ValidationIssue, ValidationReport, ValidatorComposite, failure_class,
};
