//! Post-build validation: validators, the composite that runs them, and the
//! aggregated failure set they record into.
//!
//! Validation never aborts a build. Every validator visits every
//! specification, then finalizes; failures accumulate in
//! [`ValidationFailures`] and are projected into a [`ValidationReport`]
//! for whoever decides whether the application may start.

use crate::error::short_type_name;
use crate::fingerprint::compute_failure_id;
use crate::holder::FacetHolder;
use crate::identifier::Identifier;
use crate::spec::ObjectSpecification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub mod failure_class {
    pub const ACTION_OVERLOADING: &str = "action_overloading";
    pub const ACTION_ON_UNKNOWN_TYPE: &str = "action_on_unknown_type";
    pub const LOGICAL_TYPE_COLLISION: &str = "logical_type_collision";
    pub const METADATA_ERROR: &str = "metadata_error";
}

/// One recorded validation finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub failure_id: String,
    pub failure_class: String,
    /// Type name of the specification the failure was raised against.
    pub type_name: String,
    /// Full identity string of the offending element.
    pub origin: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(
        failure_class: &str,
        type_name: impl Into<String>,
        origin: &Identifier,
        message: impl Into<String>,
    ) -> Self {
        let origin = origin.full_identity_string();
        let message = message.into();
        Self {
            failure_id: compute_failure_id(failure_class, &origin, &message),
            failure_class: failure_class.to_string(),
            type_name: type_name.into(),
            origin,
            message,
        }
    }
}

/// Failures accumulated across one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailures {
    failures: Vec<ValidationFailure>,
}

impl ValidationFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(
        &mut self,
        failure_class: &str,
        spec: &ObjectSpecification,
        origin: &Identifier,
        message: impl Into<String>,
    ) {
        self.record(ValidationFailure::new(
            failure_class,
            spec.type_name(),
            origin,
            message,
        ));
    }

    /// Records a failure built without a specification at hand, e.g. in `finalize`.
    pub fn record(&mut self, failure: ValidationFailure) {
        tracing::warn!(
            failure_class = %failure.failure_class,
            origin = %failure.origin,
            "{}",
            failure.message
        );
        self.failures.push(failure);
    }

    /// Records a failure whose message is rendered from `args`.
    ///
    /// ```ignore
    /// failures.raise_formatted(
    ///     failure_class::ACTION_OVERLOADING,
    ///     spec,
    ///     action.identifier(),
    ///     format_args!("action {} is overloaded", name),
    /// );
    /// ```
    pub fn raise_formatted(
        &mut self,
        failure_class: &str,
        spec: &ObjectSpecification,
        origin: &Identifier,
        args: fmt::Arguments<'_>,
    ) {
        self.raise(failure_class, spec, origin, args.to_string());
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    pub fn for_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ValidationFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.type_name == type_name)
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::from_issues(
            self.failures
                .iter()
                .map(|failure| ValidationIssue {
                    failure_class: failure.failure_class.clone(),
                    path: failure.origin.clone(),
                    message: failure.message.clone(),
                    failure_id: failure.failure_id.clone(),
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ValidationFailures {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub failure_class: String,
    pub path: String,
    pub message: String,
    pub failure_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub result: String,
    pub failure_classes: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(mut issues: Vec<ValidationIssue>) -> Self {
        issues.sort_by(|a, b| {
            (&a.path, &a.failure_class, &a.message).cmp(&(&b.path, &b.failure_class, &b.message))
        });
        let failure_classes: Vec<String> = issues
            .iter()
            .map(|issue| issue.failure_class.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            result: if issues.is_empty() {
                "accepted".to_string()
            } else {
                "rejected".to_string()
            },
            failure_classes,
            issues,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result == "accepted"
    }
}

/// A post-build check over finished specifications.
///
/// `visit` is called once per specification, then `finalize` once. Validators
/// that aggregate across specifications keep state between the two and must
/// reset it in `finalize`, so the same validator can run again after a reload.
pub trait MetaModelValidator: Send {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn visit(&mut self, spec: &ObjectSpecification, failures: &mut ValidationFailures);

    fn finalize(&mut self, _failures: &mut ValidationFailures) {}
}

/// Validators registered through the programming model, run in registration order.
#[derive(Default)]
pub struct ValidatorComposite {
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl ValidatorComposite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, validator: Box<dyn MetaModelValidator>) {
        tracing::debug!(validator = validator.name(), "validator registered");
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|validator| validator.name()).collect()
    }

    /// Runs every validator over every specification. Nothing short-circuits.
    pub fn validate<'a>(
        &mut self,
        specs: impl IntoIterator<Item = &'a ObjectSpecification> + Clone,
    ) -> ValidationFailures {
        let mut failures = ValidationFailures::new();
        for validator in &mut self.validators {
            for spec in specs.clone() {
                validator.visit(spec, &mut failures);
            }
            validator.finalize(&mut failures);
        }
        tracing::info!(
            validators = self.validators.len(),
            failures = failures.len(),
            "metamodel validated"
        );
        failures
    }
}

impl fmt::Debug for ValidatorComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Reports every metadata error recorded on a specification, its members and
/// their parameters.
#[derive(Debug, Default)]
pub struct MetadataErrorValidator;

impl MetaModelValidator for MetadataErrorValidator {
    fn visit(&mut self, spec: &ObjectSpecification, failures: &mut ValidationFailures) {
        for error in spec.metadata_errors() {
            failures.raise(failure_class::METADATA_ERROR, spec, spec.identifier(), error);
        }
        for member in spec.members() {
            for error in member.metadata_errors() {
                failures.raise(failure_class::METADATA_ERROR, spec, member.identifier(), error);
            }
            for parameter in member.parameters() {
                for error in parameter.metadata_errors() {
                    failures.raise(
                        failure_class::METADATA_ERROR,
                        spec,
                        parameter.identifier(),
                        error,
                    );
                }
            }
        }
    }
}
