//! The dispatch engine between the loader and the facet factories.
//!
//! Every lookup the hot path needs (factories per feature type, supporting
//! method prefixes, filtering and accessor-identifying factories) is derived
//! once from the frozen programming model and cached. `init` primes the
//! caches; `shutdown` drops them.

use crate::context::MetaModelContext;
use crate::descriptor::{ClassDescriptor, MethodDescriptor};
use crate::error::MetamodelError;
use crate::factory::{
    FacetFactory, MethodRemover, ProcessClassContext, ProcessMethodContext,
    ProcessParameterContext,
};
use crate::feature::FeatureType;
use crate::holder::FacetHolder;
use crate::programming_model::ProgrammingModel;
use crate::spec::{FacetedMethod, FacetedMethodParameter, ObjectSpecification};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

type FactoryList = Vec<Arc<dyn FacetFactory>>;

#[derive(Default)]
struct Caches {
    factories_by_feature_type: OnceLock<BTreeMap<FeatureType, FactoryList>>,
    method_prefixes: OnceLock<Vec<&'static str>>,
    method_filtering_factories: OnceLock<FactoryList>,
    property_or_collection_identifying_factories: OnceLock<FactoryList>,
    object_spec_id_factories: OnceLock<FactoryList>,
}

pub struct FacetProcessor {
    programming_model: Arc<ProgrammingModel>,
    context: Arc<MetaModelContext>,
    caches: Caches,
}

impl FacetProcessor {
    pub fn new(programming_model: Arc<ProgrammingModel>, context: Arc<MetaModelContext>) -> Self {
        Self {
            programming_model,
            context,
            caches: Caches::default(),
        }
    }

    pub fn programming_model(&self) -> &Arc<ProgrammingModel> {
        &self.programming_model
    }

    pub fn meta_model_context(&self) -> &Arc<MetaModelContext> {
        &self.context
    }

    /// Rebuilds every cache from the frozen programming model.
    pub fn init(&mut self) -> Result<(), MetamodelError> {
        if !self.programming_model.is_initialized() {
            return Err(MetamodelError::ProgrammingModelNotInitialized);
        }
        self.clear_caches();
        let by_type = self.factories_by_feature_type();
        tracing::debug!(
            object = by_type.get(&FeatureType::Object).map_or(0, Vec::len),
            property = by_type.get(&FeatureType::Property).map_or(0, Vec::len),
            collection = by_type.get(&FeatureType::Collection).map_or(0, Vec::len),
            action = by_type.get(&FeatureType::Action).map_or(0, Vec::len),
            prefixes = self.method_prefixes().len(),
            filtering = self.method_filtering_factories().len(),
            accessor_identifying = self.property_or_collection_identifying_factories().len(),
            object_spec_id = self.object_spec_id_factories().len(),
            "facet processor caches primed"
        );
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.clear_caches();
    }

    pub fn clear_caches(&mut self) {
        self.caches = Caches::default();
    }

    fn factories_by_feature_type(&self) -> &BTreeMap<FeatureType, FactoryList> {
        self.caches.factories_by_feature_type.get_or_init(|| {
            let mut by_type: BTreeMap<FeatureType, FactoryList> = BTreeMap::new();
            for factory in self.programming_model.stream() {
                for feature_type in factory.feature_types().iter() {
                    by_type
                        .entry(feature_type)
                        .or_default()
                        .push(Arc::clone(factory));
                }
            }
            by_type
        })
    }

    fn factories_for(&self, feature_type: FeatureType) -> &[Arc<dyn FacetFactory>] {
        self.factories_by_feature_type()
            .get(&feature_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn method_prefixes(&self) -> &[&'static str] {
        self.caches.method_prefixes.get_or_init(|| {
            self.programming_model
                .stream()
                .flat_map(|factory| factory.capabilities().method_prefixes.iter().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }

    fn collect_factories(&self, has: impl Fn(&dyn FacetFactory) -> bool) -> FactoryList {
        self.programming_model
            .stream()
            .filter(|&factory| has(&**factory))
            .cloned()
            .collect()
    }

    fn method_filtering_factories(&self) -> &[Arc<dyn FacetFactory>] {
        self.caches.method_filtering_factories.get_or_init(|| {
            self.collect_factories(|factory| factory.capabilities().method_filtering.is_some())
        })
    }

    fn property_or_collection_identifying_factories(&self) -> &[Arc<dyn FacetFactory>] {
        self.caches
            .property_or_collection_identifying_factories
            .get_or_init(|| {
                self.collect_factories(|factory| {
                    factory
                        .capabilities()
                        .property_or_collection_identifying
                        .is_some()
                })
            })
    }

    fn object_spec_id_factories(&self) -> &[Arc<dyn FacetFactory>] {
        self.caches.object_spec_id_factories.get_or_init(|| {
            self.collect_factories(|factory| factory.capabilities().object_spec_id.is_some())
        })
    }

    /// Whether `method` is metamodel plumbing rather than a business member:
    /// its name starts with a supporting-method prefix, or a filtering
    /// factory claims it.
    pub fn recognizes(&self, method: &MethodDescriptor) -> bool {
        if self
            .method_prefixes()
            .iter()
            .any(|prefix| method.name.starts_with(prefix))
        {
            return true;
        }
        self.method_filtering_factories().iter().any(|factory| {
            factory
                .capabilities()
                .method_filtering
                .is_some_and(|filtering| filtering.recognizes(method))
        })
    }

    /// Installs the logical type name, before any other object-level processing.
    pub fn process_object_spec_id(
        &self,
        class: &ClassDescriptor,
        remover: &mut dyn MethodRemover,
        spec: &mut ObjectSpecification,
    ) -> Result<(), MetamodelError> {
        for factory in self.object_spec_id_factories() {
            let Some(spec_id) = factory.capabilities().object_spec_id else {
                continue;
            };
            let mut ctx = ProcessClassContext::new(class, &mut *remover, &mut *spec, &self.context);
            spec_id.process_object_spec_id(&mut ctx)?;
        }
        Ok(())
    }

    pub fn process_class(
        &self,
        class: &ClassDescriptor,
        remover: &mut dyn MethodRemover,
        spec: &mut ObjectSpecification,
    ) -> Result<(), MetamodelError> {
        for factory in self.factories_for(FeatureType::Object) {
            tracing::debug!(factory = factory.name(), class = %class.name, "process class");
            let mut ctx = ProcessClassContext::new(class, &mut *remover, &mut *spec, &self.context);
            factory.process_class(&mut ctx)?;
        }
        Ok(())
    }

    pub fn process_method(
        &self,
        class: &ClassDescriptor,
        method: &MethodDescriptor,
        remover: &mut dyn MethodRemover,
        member: &mut FacetedMethod,
        feature_type: FeatureType,
        is_mixin_main: bool,
    ) -> Result<(), MetamodelError> {
        for factory in self.factories_for(feature_type) {
            tracing::debug!(
                factory = factory.name(),
                member = %member.identifier(),
                %feature_type,
                is_mixin_main,
                "process method"
            );
            let mut ctx = ProcessMethodContext::new(
                class,
                method,
                feature_type,
                is_mixin_main,
                &mut *remover,
                &mut *member,
                &self.context,
            );
            factory.process_method(&mut ctx)?;
        }
        Ok(())
    }

    pub fn process_params(
        &self,
        class: &ClassDescriptor,
        method: &MethodDescriptor,
        param_index: usize,
        remover: &mut dyn MethodRemover,
        parameter: &mut FacetedMethodParameter,
    ) -> Result<(), MetamodelError> {
        for factory in self.factories_for(parameter.feature_type()) {
            tracing::debug!(
                factory = factory.name(),
                parameter = %parameter.identifier(),
                "process parameter"
            );
            let mut ctx = ProcessParameterContext::new(
                class,
                method,
                param_index,
                &mut *remover,
                &mut *parameter,
                &self.context,
            );
            factory.process_params(&mut ctx)?;
        }
        Ok(())
    }

    /// Calls `on_candidate` for each method any accessor-identifying factory
    /// considers a property or collection getter.
    pub fn find_association_candidate_accessors<'m>(
        &self,
        methods: impl IntoIterator<Item = &'m MethodDescriptor>,
        mut on_candidate: impl FnMut(&'m MethodDescriptor),
    ) {
        let factories = self.property_or_collection_identifying_factories();
        for method in methods {
            let is_candidate = factories.iter().any(|factory| {
                factory
                    .capabilities()
                    .property_or_collection_identifying
                    .is_some_and(|identifying| identifying.is_property_or_collection_getter(method))
            });
            if is_candidate {
                on_candidate(method);
            }
        }
    }

    pub fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    ) {
        for factory in self.property_or_collection_identifying_factories() {
            if let Some(identifying) = factory.capabilities().property_or_collection_identifying {
                identifying.find_and_remove_property_accessors(remover, out);
            }
        }
    }

    pub fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    ) {
        for factory in self.property_or_collection_identifying_factories() {
            if let Some(identifying) = factory.capabilities().property_or_collection_identifying {
                identifying.find_and_remove_collection_accessors(remover, out);
            }
        }
    }
}

impl std::fmt::Debug for FacetProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetProcessor")
            .field("programming_model", &self.programming_model)
            .field(
                "primed",
                &self.caches.factories_by_feature_type.get().is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean_sort::BeanSort;
    use crate::facet::{Facet, FacetValue, Precedence, facet_type};
    use crate::factory::{Capabilities, MethodFilteringFacetFactory};
    use crate::feature::FeatureTypes;
    use crate::method_pool::MethodPool;
    use crate::programming_model::{ProcessingOrder, ProgrammingModelInitFilter};
    use crate::validation::ValidatorComposite;

    struct HideSupport;

    impl FacetFactory for HideSupport {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::MEMBERS
        }

        fn capabilities(&self) -> Capabilities<'_> {
            Capabilities::none().with_method_prefixes(&["hide", "validate"])
        }
    }

    struct IteratorFilter;

    impl FacetFactory for IteratorFilter {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::NONE
        }

        fn capabilities(&self) -> Capabilities<'_> {
            Capabilities::none().with_method_filtering(self)
        }
    }

    impl MethodFilteringFacetFactory for IteratorFilter {
        fn recognizes(&self, method: &MethodDescriptor) -> bool {
            method.name == "iterator"
        }
    }

    struct NameFromClass;

    impl FacetFactory for NameFromClass {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::OBJECTS_ONLY
        }

        fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
            let name = ctx.class().simple_name().to_string();
            ctx.add_facet(Facet::new(
                facet_type::NAMED,
                Precedence::Inferred,
                FacetValue::Text(name),
            ));
            Ok(())
        }
    }

    struct Broken;

    impl FacetFactory for Broken {
        fn feature_types(&self) -> FeatureTypes {
            FeatureTypes::OBJECTS_ONLY
        }

        fn process_class(&self, ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
            Err(MetamodelError::factory(
                self.name(),
                ctx.holder().identifier(),
                "unsupported",
            ))
        }
    }

    fn processor(mut model: ProgrammingModel) -> FacetProcessor {
        model
            .init(&ProgrammingModelInitFilter::accept_all(), &mut ValidatorComposite::new())
            .expect("init");
        let mut processor =
            FacetProcessor::new(Arc::new(model), Arc::new(MetaModelContext::default()));
        processor.init().expect("processor init");
        processor
    }

    fn supporting_model() -> ProgrammingModel {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::C1MethodRemoving, || HideSupport, &[])
            .expect("registers");
        model
            .add_factory(ProcessingOrder::C1MethodRemoving, || IteratorFilter, &[])
            .expect("registers");
        model
    }

    #[test]
    fn prefix_match_is_recognized_without_filtering_factory() {
        let processor = processor(supporting_model());
        assert!(processor.recognizes(&MethodDescriptor::new("validateFoo")));
        assert!(processor.recognizes(&MethodDescriptor::new("hideName")));
        assert!(!processor.recognizes(&MethodDescriptor::new("placeOrder")));
    }

    #[test]
    fn filtering_factory_match_is_recognized_without_prefix() {
        let processor = processor(supporting_model());
        assert!(processor.recognizes(&MethodDescriptor::new("iterator")));
    }

    #[test]
    fn uninitialized_model_is_rejected() {
        let mut processor = FacetProcessor::new(
            Arc::new(ProgrammingModel::new()),
            Arc::new(MetaModelContext::default()),
        );
        assert!(matches!(
            processor.init(),
            Err(MetamodelError::ProgrammingModelNotInitialized)
        ));
    }

    #[test]
    fn object_factories_are_dispatched() {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::B1ObjectNaming, || NameFromClass, &[])
            .expect("registers");
        let processor = processor(model);

        let class = ClassDescriptor::new("dom.Customer");
        let mut spec = ObjectSpecification::new(class.clone(), BeanSort::ViewModel);
        let mut pool = MethodPool::default();
        processor
            .process_class(&class, &mut pool, &mut spec)
            .expect("processes");
        assert_eq!(
            spec.get_facet(facet_type::NAMED).and_then(Facet::as_text),
            Some("Customer")
        );
    }

    #[test]
    fn factory_errors_propagate() {
        let mut model = ProgrammingModel::new();
        model
            .add_factory(ProcessingOrder::A1FallbackDefaults, || Broken, &[])
            .expect("registers");
        let processor = processor(model);

        let class = ClassDescriptor::new("dom.Customer");
        let mut spec = ObjectSpecification::new(class.clone(), BeanSort::ViewModel);
        let err = processor
            .process_class(&class, &mut MethodPool::default(), &mut spec)
            .expect_err("factory fails");
        assert_eq!(
            err.to_string(),
            "facet factory Broken failed on dom.Customer: unsupported"
        );
    }

    #[test]
    fn shutdown_drops_caches_and_init_rebuilds_them() {
        let mut processor = processor(supporting_model());
        processor.shutdown();
        assert!(processor.caches.method_prefixes.get().is_none());
        processor.init().expect("re-init");
        assert!(processor.caches.method_prefixes.get().is_some());
    }
}
