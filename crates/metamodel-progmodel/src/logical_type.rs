//! Logical type names and their uniqueness across the metamodel.

use metamodel_kernel::descriptor::annotation;
use metamodel_kernel::{
    Capabilities, Facet, FacetFactory, FacetHolder, FacetValue, FeatureTypes, Identifier,
    MetaModelRefiner, MetaModelValidator, MetamodelError, ObjectSpecIdFacetFactory,
    ObjectSpecification, Precedence, ProcessClassContext, ValidationFailure, ValidationFailures,
    ValidatorComposite, facet_type, failure_class,
};
use std::collections::BTreeMap;

const LOGICAL_TYPE_ANNOTATIONS: [&str; 3] = [
    annotation::DOMAIN_OBJECT,
    annotation::DOMAIN_SERVICE,
    annotation::VALUE,
];

/// Installs the logical type name: `logicalTypeName` from the class
/// annotation when present, otherwise the fully qualified class name.
#[derive(Debug)]
pub struct LogicalTypeFacetFactory {
    unique_logical_types: bool,
}

impl LogicalTypeFacetFactory {
    /// With `unique_logical_types`, contributes a [`LogicalTypeUniquenessValidator`].
    pub fn new(unique_logical_types: bool) -> Self {
        Self {
            unique_logical_types,
        }
    }
}

impl FacetFactory for LogicalTypeFacetFactory {
    fn feature_types(&self) -> FeatureTypes {
        FeatureTypes::OBJECTS_ONLY
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none()
            .with_object_spec_id(self)
            .with_validator_refiner(self)
    }
}

impl ObjectSpecIdFacetFactory for LogicalTypeFacetFactory {
    fn process_object_spec_id(
        &self,
        ctx: &mut ProcessClassContext<'_>,
    ) -> Result<(), MetamodelError> {
        let class = ctx.class();
        let declared = LOGICAL_TYPE_ANNOTATIONS.iter().find_map(|name| {
            class
                .annotation(name)
                .and_then(|annotation| annotation.attr_str("logicalTypeName"))
        });
        let facet = match declared {
            Some(name) => Facet::new(
                facet_type::LOGICAL_TYPE,
                Precedence::Explicit,
                FacetValue::Text(name.to_string()),
            ),
            None => Facet::new(
                facet_type::LOGICAL_TYPE,
                Precedence::Inferred,
                FacetValue::Text(class.name.clone()),
            ),
        };
        ctx.add_facet(facet);
        Ok(())
    }
}

impl MetaModelRefiner for LogicalTypeFacetFactory {
    fn refine_programming_model(&self, validators: &mut ValidatorComposite) {
        if self.unique_logical_types {
            validators.add(Box::new(LogicalTypeUniquenessValidator::default()));
        }
    }
}

/// Fails every specification whose logical type name another specification also uses.
///
/// Names are collected in `visit` and compared in `finalize`.
#[derive(Debug, Default)]
pub struct LogicalTypeUniquenessValidator {
    owners: BTreeMap<String, Vec<(String, Identifier)>>,
}

impl MetaModelValidator for LogicalTypeUniquenessValidator {
    fn visit(&mut self, spec: &ObjectSpecification, _failures: &mut ValidationFailures) {
        if spec.bean_sort().is_mixin() {
            return;
        }
        self.owners
            .entry(spec.logical_type_name().to_string())
            .or_default()
            .push((spec.type_name().to_string(), spec.identifier().clone()));
    }

    fn finalize(&mut self, failures: &mut ValidationFailures) {
        for (logical_type, owners) in std::mem::take(&mut self.owners) {
            if owners.len() < 2 {
                continue;
            }
            let names: Vec<&str> = owners
                .iter()
                .map(|(type_name, _)| type_name.as_str())
                .collect();
            for (type_name, identifier) in &owners {
                failures.record(ValidationFailure::new(
                    failure_class::LOGICAL_TYPE_COLLISION,
                    type_name.as_str(),
                    identifier,
                    format!(
                        "logical type name '{logical_type}' is used by more than one type: {}",
                        names.join(", ")
                    ),
                ));
            }
        }
    }
}
