//! The finished, read-only metamodel.

use crate::fingerprint::compute_metamodel_digest;
use crate::holder::FacetHolder;
use crate::layout::ObjectLayout;
use crate::spec::ObjectSpecification;
use crate::validation::{ValidationFailures, ValidationReport};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::collections::btree_map::Values;

pub const METAMODEL_KIND: &str = "metamodel.export.v1";
pub const METAMODEL_SCHEMA: u32 = 1;

/// Specifications keyed by type name, plus the failures validation recorded.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Metamodel {
    specs: BTreeMap<String, ObjectSpecification>,
    failures: ValidationFailures,
}

impl Metamodel {
    pub(crate) fn new(
        specs: BTreeMap<String, ObjectSpecification>,
        failures: ValidationFailures,
    ) -> Self {
        Self { specs, failures }
    }

    pub fn spec(&self, type_name: &str) -> Option<&ObjectSpecification> {
        self.specs.get(type_name)
    }

    pub fn spec_by_logical_type(&self, logical_type_name: &str) -> Option<&ObjectSpecification> {
        self.specs
            .values()
            .find(|spec| spec.logical_type_name() == logical_type_name)
    }

    pub fn specs(&self) -> Values<'_, String, ObjectSpecification> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn failures(&self) -> &ValidationFailures {
        &self.failures
    }

    pub fn report(&self) -> ValidationReport {
        self.failures.report()
    }

    /// Layout of `type_name`, looked up by type name or logical type name.
    pub fn layout(&self, type_name: &str) -> Option<ObjectLayout> {
        self.spec(type_name)
            .or_else(|| self.spec_by_logical_type(type_name))
            .map(ObjectLayout::for_spec)
    }

    /// Every specification, member, parameter and facet, for downstream consumers.
    pub fn to_json(&self) -> Value {
        json!({
            "schema": METAMODEL_SCHEMA,
            "kind": METAMODEL_KIND,
            "specifications": self.specs.values().collect::<Vec<_>>(),
        })
    }

    /// Deterministic digest over the exported specifications.
    pub fn digest(&self) -> String {
        compute_metamodel_digest(&self.to_json())
    }

    /// Number of facets installed across every holder.
    pub fn facet_count(&self) -> usize {
        self.specs
            .values()
            .map(|spec| {
                spec.facet_map().len()
                    + spec
                        .members()
                        .iter()
                        .map(|member| {
                            member.facet_map().len()
                                + member
                                    .parameters()
                                    .iter()
                                    .map(|parameter| parameter.facet_map().len())
                                    .sum::<usize>()
                        })
                        .sum::<usize>()
            })
            .sum()
    }
}
