//! The programming model: an ordered registry of facet factories,
//! validators and post-processors.
//!
//! Entries are registered under a [`ProcessingOrder`] bucket with optional
//! [`Marker`]s. `init` walks the buckets in enum order and each bucket in
//! registration order, drops entries the [`ProgrammingModelInitFilter`]
//! rejects, constructs the rest and freezes the result. Suppliers of
//! rejected entries are never invoked.

use crate::error::{MetamodelError, short_type_name};
use crate::factory::FacetFactory;
use crate::post_process::ObjectSpecificationPostProcessor;
use crate::validation::{MetaModelValidator, ValidatorComposite};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Execution phases. Factories in an earlier phase always run first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingOrder {
    A1FallbackDefaults,
    A2AfterFallbackDefaults,
    B1ObjectNaming,
    C1MethodRemoving,
    C2AfterMethodRemoving,
    D1MandatorySupport,
    E1MemberModelling,
    F1Layout,
    G1ValueTypes,
    Z1Finally,
}

impl ProcessingOrder {
    pub const ALL: [ProcessingOrder; 10] = [
        ProcessingOrder::A1FallbackDefaults,
        ProcessingOrder::A2AfterFallbackDefaults,
        ProcessingOrder::B1ObjectNaming,
        ProcessingOrder::C1MethodRemoving,
        ProcessingOrder::C2AfterMethodRemoving,
        ProcessingOrder::D1MandatorySupport,
        ProcessingOrder::E1MemberModelling,
        ProcessingOrder::F1Layout,
        ProcessingOrder::G1ValueTypes,
        ProcessingOrder::Z1Finally,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingOrder::A1FallbackDefaults => "A1_FALLBACK_DEFAULTS",
            ProcessingOrder::A2AfterFallbackDefaults => "A2_AFTER_FALLBACK_DEFAULTS",
            ProcessingOrder::B1ObjectNaming => "B1_OBJECT_NAMING",
            ProcessingOrder::C1MethodRemoving => "C1_METHOD_REMOVING",
            ProcessingOrder::C2AfterMethodRemoving => "C2_AFTER_METHOD_REMOVING",
            ProcessingOrder::D1MandatorySupport => "D1_MANDATORY_SUPPORT",
            ProcessingOrder::E1MemberModelling => "E1_MEMBER_MODELLING",
            ProcessingOrder::F1Layout => "F1_LAYOUT",
            ProcessingOrder::G1ValueTypes => "G1_VALUE_TYPES",
            ProcessingOrder::Z1Finally => "Z1_FINALLY",
        }
    }
}

impl fmt::Display for ProcessingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels attached to registrations so whole groups can be switched off.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Deprecated,
    Incubating,
    Internal,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Deprecated => "deprecated",
            Marker::Incubating => "incubating",
            Marker::Internal => "internal",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which registrations survive `init`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgrammingModelInitFilter {
    excluded: BTreeSet<Marker>,
}

impl ProgrammingModelInitFilter {
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Rejects every registration carrying at least one of `markers`.
    pub fn excluding(markers: impl IntoIterator<Item = Marker>) -> Self {
        Self {
            excluded: markers.into_iter().collect(),
        }
    }

    pub fn accepts(&self, markers: &[Marker]) -> bool {
        !markers.iter().any(|marker| self.excluded.contains(marker))
    }

    pub fn excluded_markers(&self) -> impl Iterator<Item = Marker> + '_ {
        self.excluded.iter().copied()
    }
}

type FactorySupplier = Box<dyn Fn() -> Arc<dyn FacetFactory> + Send + Sync>;
type ValidatorSupplier = Box<dyn Fn() -> Box<dyn MetaModelValidator> + Send + Sync>;
type PostProcessorSupplier = Box<dyn Fn() -> Arc<dyn ObjectSpecificationPostProcessor> + Send + Sync>;

struct FactoryEntry {
    order: ProcessingOrder,
    type_id: TypeId,
    name: &'static str,
    markers: Vec<Marker>,
    supplier: FactorySupplier,
    instance: OnceLock<Arc<dyn FacetFactory>>,
}

impl FactoryEntry {
    fn instance(&self) -> &Arc<dyn FacetFactory> {
        self.instance.get_or_init(|| {
            tracing::debug!(factory = self.name, order = %self.order, "constructing facet factory");
            (self.supplier)()
        })
    }
}

struct ValidatorEntry {
    name: &'static str,
    markers: Vec<Marker>,
    supplier: ValidatorSupplier,
}

struct PostProcessorEntry {
    order: ProcessingOrder,
    name: &'static str,
    markers: Vec<Marker>,
    supplier: PostProcessorSupplier,
}

/// A factory that survived `init`, in execution order.
#[derive(Clone)]
pub struct ActiveFactory {
    order: ProcessingOrder,
    markers: Vec<Marker>,
    factory: Arc<dyn FacetFactory>,
}

impl ActiveFactory {
    pub fn order(&self) -> ProcessingOrder {
        self.order
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn factory(&self) -> &Arc<dyn FacetFactory> {
        &self.factory
    }

    pub fn name(&self) -> &'static str {
        self.factory.name()
    }
}

impl fmt::Debug for ActiveFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveFactory")
            .field("order", &self.order)
            .field("name", &self.name())
            .field("markers", &self.markers)
            .finish()
    }
}

/// Kind of a registry entry, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    Factory,
    Validator,
    PostProcessor,
}

/// Summary of one registration, accepted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub kind: RegistrationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ProcessingOrder>,
    pub name: &'static str,
    pub markers: Vec<Marker>,
}

struct Frozen {
    factories: Vec<ActiveFactory>,
    post_processors: Vec<Arc<dyn ObjectSpecificationPostProcessor>>,
}

#[derive(Default)]
pub struct ProgrammingModel {
    factories: Vec<FactoryEntry>,
    validators: Vec<ValidatorEntry>,
    post_processors: Vec<PostProcessorEntry>,
    frozen: Option<Frozen>,
}

impl ProgrammingModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn assert_not_initialized(&self, operation: &'static str) -> Result<(), MetamodelError> {
        if self.frozen.is_some() {
            return Err(MetamodelError::ProgrammingModelFrozen { operation });
        }
        Ok(())
    }

    /// Registers factory type `F` under `order`. `supplier` runs at most once, during `init`.
    pub fn add_factory<F: FacetFactory>(
        &mut self,
        order: ProcessingOrder,
        supplier: impl Fn() -> F + Send + Sync + 'static,
        markers: &[Marker],
    ) -> Result<(), MetamodelError> {
        self.assert_not_initialized("add a facet factory")?;
        let type_id = TypeId::of::<F>();
        let name = short_type_name(std::any::type_name::<F>());
        if self.factories.iter().any(|entry| entry.type_id == type_id) {
            return Err(MetamodelError::DuplicateFactory { factory: name });
        }
        self.factories.push(FactoryEntry {
            order,
            type_id,
            name,
            markers: markers.to_vec(),
            supplier: Box::new(move || Arc::new(supplier()) as Arc<dyn FacetFactory>),
            instance: OnceLock::new(),
        });
        Ok(())
    }

    pub fn add_validator<V: MetaModelValidator + 'static>(
        &mut self,
        supplier: impl Fn() -> V + Send + Sync + 'static,
        markers: &[Marker],
    ) -> Result<(), MetamodelError> {
        self.assert_not_initialized("add a validator")?;
        self.validators.push(ValidatorEntry {
            name: short_type_name(std::any::type_name::<V>()),
            markers: markers.to_vec(),
            supplier: Box::new(move || Box::new(supplier()) as Box<dyn MetaModelValidator>),
        });
        Ok(())
    }

    pub fn add_post_processor<P: ObjectSpecificationPostProcessor>(
        &mut self,
        order: ProcessingOrder,
        supplier: impl Fn() -> P + Send + Sync + 'static,
        markers: &[Marker],
    ) -> Result<(), MetamodelError> {
        self.assert_not_initialized("add a post-processor")?;
        self.post_processors.push(PostProcessorEntry {
            order,
            name: short_type_name(std::any::type_name::<P>()),
            markers: markers.to_vec(),
            supplier: Box::new(move || {
                Arc::new(supplier()) as Arc<dyn ObjectSpecificationPostProcessor>
            }),
        });
        Ok(())
    }

    /// Resolves the filtered, ordered factory list and freezes the model.
    ///
    /// Accepted validators, and those contributed by refining factories, are
    /// moved into `validators`.
    pub fn init(
        &mut self,
        filter: &ProgrammingModelInitFilter,
        validators: &mut ValidatorComposite,
    ) -> Result<(), MetamodelError> {
        self.assert_not_initialized("initialize twice")?;

        let mut entries: Vec<&FactoryEntry> = self.factories.iter().collect();
        // stable: registration order is kept within a bucket
        entries.sort_by_key(|entry| entry.order);

        let mut factories = Vec::with_capacity(entries.len());
        for entry in entries {
            if !filter.accepts(&entry.markers) {
                tracing::debug!(factory = entry.name, markers = ?entry.markers, "facet factory excluded");
                continue;
            }
            let factory = Arc::clone(entry.instance());
            if let Some(refiner) = factory.capabilities().validator_refiner {
                refiner.refine_programming_model(validators);
            }
            factories.push(ActiveFactory {
                order: entry.order,
                markers: entry.markers.clone(),
                factory,
            });
        }

        for entry in &self.validators {
            if filter.accepts(&entry.markers) {
                validators.add((entry.supplier)());
            } else {
                tracing::debug!(validator = entry.name, markers = ?entry.markers, "validator excluded");
            }
        }

        let mut entries: Vec<&PostProcessorEntry> = self.post_processors.iter().collect();
        entries.sort_by_key(|entry| entry.order);
        let mut post_processors = Vec::with_capacity(entries.len());
        for entry in entries {
            if filter.accepts(&entry.markers) {
                post_processors.push((entry.supplier)());
            } else {
                tracing::debug!(post_processor = entry.name, markers = ?entry.markers, "post-processor excluded");
            }
        }

        tracing::info!(
            factories = factories.len(),
            validators = validators.len(),
            post_processors = post_processors.len(),
            excluded = ?filter.excluded_markers().collect::<Vec<_>>(),
            "programming model initialized"
        );
        self.frozen = Some(Frozen {
            factories,
            post_processors,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.frozen.is_some()
    }

    /// The frozen factories in execution order; empty before `init`.
    pub fn stream(&self) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
        self.active_factories().iter().map(ActiveFactory::factory)
    }

    pub fn active_factories(&self) -> &[ActiveFactory] {
        self.frozen
            .as_ref()
            .map(|frozen| frozen.factories.as_slice())
            .unwrap_or_default()
    }

    /// The frozen post-processors in execution order; empty before `init`.
    pub fn post_processors(&self) -> &[Arc<dyn ObjectSpecificationPostProcessor>] {
        self.frozen
            .as_ref()
            .map(|frozen| frozen.post_processors.as_slice())
            .unwrap_or_default()
    }

    /// Every registration in registration order, regardless of filtering.
    pub fn registrations(&self) -> Vec<Registration> {
        let factories = self.factories.iter().map(|entry| Registration {
            kind: RegistrationKind::Factory,
            order: Some(entry.order),
            name: entry.name,
            markers: entry.markers.clone(),
        });
        let validators = self.validators.iter().map(|entry| Registration {
            kind: RegistrationKind::Validator,
            order: None,
            name: entry.name,
            markers: entry.markers.clone(),
        });
        let post_processors = self.post_processors.iter().map(|entry| Registration {
            kind: RegistrationKind::PostProcessor,
            order: Some(entry.order),
            name: entry.name,
            markers: entry.markers.clone(),
        });
        factories.chain(validators).chain(post_processors).collect()
    }
}

impl fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgrammingModel")
            .field("factories", &self.factories.len())
            .field("validators", &self.validators.len())
            .field("post_processors", &self.post_processors.len())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureTypes;
    use crate::spec::ObjectSpecification;
    use crate::validation::ValidationFailures;

    struct First;
    struct Second;
    struct Third;

    impl FacetFactory for First {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::OBJECTS_ONLY
        }
    }
    impl FacetFactory for Second {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::MEMBERS
        }
    }
    impl FacetFactory for Third {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::OBJECTS_ONLY
        }
    }

    struct Noop;
    impl MetaModelValidator for Noop {
        fn visit(&mut self, _spec: &ObjectSpecification, _failures: &mut ValidationFailures) {}
    }

    fn names(model: &ProgrammingModel) -> Vec<&'static str> {
        model.stream().map(|factory| factory.name()).collect()
    }

    #[test]
    fn stream_is_empty_before_init() {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::A1FallbackDefaults, || First, &[])
            .expect("registers");
        assert_eq!(model.stream().count(), 0);
        assert!(model.post_processors().is_empty());
        assert!(!model.is_initialized());
    }

    #[test]
    fn buckets_run_in_enum_order_then_registration_order() {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::Z1Finally, || First, &[])
            .expect("registers");
        model
            .add_factory(ProcessingOrder::C1MethodRemoving, || Second, &[])
            .expect("registers");
        model
            .add_factory(ProcessingOrder::C1MethodRemoving, || Third, &[])
            .expect("registers");
        model
            .init(&ProgrammingModelInitFilter::accept_all(), &mut ValidatorComposite::new())
            .expect("init");
        assert_eq!(names(&model), vec!["Second", "Third", "First"]);
    }

    #[test]
    fn registering_after_init_fails() {
        let mut model = ProgrammingModel::new();
        model
            .init(&ProgrammingModelInitFilter::accept_all(), &mut ValidatorComposite::new())
            .expect("init");
        let err = model
            .add_factory(ProcessingOrder::A1FallbackDefaults, || First, &[])
            .expect_err("frozen");
        assert!(matches!(err, MetamodelError::ProgrammingModelFrozen { .. }));
        assert!(model.add_validator(|| Noop, &[]).is_err());
        let again = model.init(&ProgrammingModelInitFilter::accept_all(), &mut ValidatorComposite::new());
        assert!(again.is_err());
    }

    #[test]
    fn duplicate_factory_type_is_rejected() {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::A1FallbackDefaults, || First, &[])
            .expect("registers");
        let err = model
            .add_factory(ProcessingOrder::E1MemberModelling, || First, &[])
            .expect_err("duplicate");
        assert!(matches!(err, MetamodelError::DuplicateFactory { factory: "First" }));
    }

    #[test]
    fn excluded_validators_never_reach_the_composite() {
        let mut model = ProgrammingModel::new();
        model.add_validator(|| Noop, &[]).expect("registers");
        model
            .add_validator(|| Noop, &[Marker::Incubating])
            .expect("registers");
        let mut composite = ValidatorComposite::new();
        model
            .init(&ProgrammingModelInitFilter::excluding([Marker::Incubating]), &mut composite)
            .expect("init");
        assert_eq!(composite.len(), 1);
        assert_eq!(model.registrations().len(), 2);
    }

    #[test]
    fn filter_accepts_unmarked_entries() {
        let filter = ProgrammingModelInitFilter::excluding([Marker::Deprecated]);
        assert!(filter.accepts(&[]));
        assert!(filter.accepts(&[Marker::Incubating]));
        assert!(!filter.accepts(&[Marker::Incubating, Marker::Deprecated]));
        assert!(ProgrammingModelInitFilter::accept_all().accepts(&[Marker::Deprecated]));
    }
}
