//! Builds a [`Metamodel`] from class descriptors.
//!
//! Per class: logical type, object-level facets, then collections and
//! properties claimed by the accessor-identifying factories, then actions
//! among the methods still in the pool, then their parameters. After every
//! class: mixin contribution, post-processing and validation.

use crate::bean_sort::BeanSort;
use crate::config::IntrospectionPolicy;
use crate::context::MetaModelContext;
use crate::descriptor::{ClassDescriptor, MethodDescriptor, annotation};
use crate::error::MetamodelError;
use crate::facet::{Facet, facet_type};
use crate::factory::MethodRemover;
use crate::feature::FeatureType;
use crate::holder::FacetHolder;
use crate::metamodel::Metamodel;
use crate::method_pool::MethodPool;
use crate::naming;
use crate::processor::FacetProcessor;
use crate::programming_model::ProgrammingModel;
use crate::spec::{FacetedMethod, ObjectSpecification};
use crate::validation::ValidatorComposite;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SpecificationLoader {
    context: Arc<MetaModelContext>,
    processor: FacetProcessor,
    validators: ValidatorComposite,
}

impl SpecificationLoader {
    /// Initializes `programming_model` with the marker filter from the
    /// context's configuration and primes the facet processor.
    pub fn new(
        mut programming_model: ProgrammingModel,
        context: MetaModelContext,
    ) -> Result<Self, MetamodelError> {
        let mut validators = ValidatorComposite::new();
        programming_model.init(&context.config().init_filter(), &mut validators)?;
        let context = Arc::new(context);
        let mut processor = FacetProcessor::new(Arc::new(programming_model), Arc::clone(&context));
        processor.init()?;
        Ok(Self {
            context,
            processor,
            validators,
        })
    }

    pub fn processor(&self) -> &FacetProcessor {
        &self.processor
    }

    pub fn programming_model(&self) -> &ProgrammingModel {
        self.processor.programming_model()
    }

    pub fn validators(&self) -> &ValidatorComposite {
        &self.validators
    }

    pub fn meta_model_context(&self) -> &MetaModelContext {
        &self.context
    }

    /// Introspects every class, contributes mixins, post-processes and validates.
    pub fn load(&mut self, classes: &[ClassDescriptor]) -> Result<Metamodel, MetamodelError> {
        let mut specs: BTreeMap<String, ObjectSpecification> = BTreeMap::new();
        for class in classes {
            if specs.contains_key(&class.name) {
                return Err(MetamodelError::DuplicateSpecification(class.name.clone()));
            }
            let spec = self.introspect(class)?;
            specs.insert(class.name.clone(), spec);
        }

        contribute_mixins(&mut specs);

        for post_processor in self.processor.programming_model().post_processors() {
            for spec in specs.values_mut() {
                post_processor
                    .post_process(spec, &self.context)
                    .map_err(|err| match err {
                        MetamodelError::PostProcessor { .. } => err,
                        other => MetamodelError::post_processor(
                            post_processor.name(),
                            spec.type_name(),
                            other.to_string(),
                        ),
                    })?;
            }
        }

        let failures = self.validators.validate(specs.values());
        tracing::info!(
            specifications = specs.len(),
            failures = failures.len(),
            "metamodel built"
        );
        Ok(Metamodel::new(specs, failures))
    }

    /// Drops the processor caches and rebuilds the metamodel from scratch.
    pub fn reload(&mut self, classes: &[ClassDescriptor]) -> Result<Metamodel, MetamodelError> {
        self.processor.shutdown();
        self.processor.init()?;
        self.load(classes)
    }

    pub fn shutdown(&mut self) {
        self.processor.shutdown();
    }

    /// Builds the specification of a single class, without mixins or validation.
    pub fn introspect(&self, class: &ClassDescriptor) -> Result<ObjectSpecification, MetamodelError> {
        let bean_sort = BeanSort::classify(class, self.context.value_types());
        let mut spec = ObjectSpecification::new(class.clone(), bean_sort);
        let mut pool = MethodPool::new(class.methods.iter().cloned());
        tracing::debug!(class = %class.name, ?bean_sort, "introspecting");

        self.processor
            .process_object_spec_id(class, &mut pool, &mut spec)?;
        self.processor.process_class(class, &mut pool, &mut spec)?;
        if !bean_sort.introspects_members() {
            return Ok(spec);
        }

        let mut collections = Vec::new();
        self.processor
            .find_and_remove_collection_accessors(&mut pool, &mut collections);
        for accessor in collections {
            self.introspect_association(class, accessor, FeatureType::Collection, &mut pool, &mut spec)?;
        }

        let mut properties = Vec::new();
        self.processor
            .find_and_remove_property_accessors(&mut pool, &mut properties);
        for accessor in properties {
            self.introspect_association(class, accessor, FeatureType::Property, &mut pool, &mut spec)?;
        }

        let mixin_main = match bean_sort {
            BeanSort::Mixin => class.mixin().map(|(_, main)| main),
            _ => None,
        };
        let candidates =
            pool.remove_methods(&|method| self.is_action_candidate(method, mixin_main));
        for method in candidates {
            let is_mixin_main = mixin_main == Some(method.name.as_str());
            self.introspect_action(class, method, is_mixin_main, &mut pool, &mut spec)?;
        }

        if !pool.is_empty() {
            tracing::debug!(
                class = %class.name,
                unclaimed = ?pool.remaining().iter().map(MethodDescriptor::signature).collect::<Vec<_>>(),
                "methods left unclaimed"
            );
        }
        Ok(spec)
    }

    fn is_action_candidate(&self, method: &MethodDescriptor, mixin_main: Option<&str>) -> bool {
        if !method.is_public || method.is_static || self.processor.recognizes(method) {
            return false;
        }
        if let Some(main) = mixin_main {
            return method.name == main;
        }
        match self.context.config().programming_model.introspection_policy {
            IntrospectionPolicy::AnnotationOptional => true,
            IntrospectionPolicy::AnnotationRequired => method.has_annotation(annotation::ACTION),
        }
    }

    fn introspect_association(
        &self,
        class: &ClassDescriptor,
        accessor: MethodDescriptor,
        feature_type: FeatureType,
        remover: &mut dyn MethodRemover,
        spec: &mut ObjectSpecification,
    ) -> Result<(), MetamodelError> {
        let mut member = FacetedMethod::for_association(&class.name, accessor.clone(), feature_type);
        self.processor
            .process_method(class, &accessor, remover, &mut member, feature_type, false)?;
        spec.add_member(member);
        Ok(())
    }

    fn introspect_action(
        &self,
        class: &ClassDescriptor,
        method: MethodDescriptor,
        is_mixin_main: bool,
        remover: &mut dyn MethodRemover,
        spec: &mut ObjectSpecification,
    ) -> Result<(), MetamodelError> {
        let mut action = FacetedMethod::for_action(&class.name, method.clone());
        self.processor.process_method(
            class,
            &method,
            &mut *remover,
            &mut action,
            FeatureType::Action,
            is_mixin_main,
        )?;
        let (backing, parameters) = action.split_parameters_mut();
        for (index, parameter) in parameters.iter_mut().enumerate() {
            self.processor
                .process_params(class, backing, index, &mut *remover, parameter)?;
        }
        spec.add_member(action);
        Ok(())
    }
}

impl std::fmt::Debug for SpecificationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationLoader")
            .field("processor", &self.processor)
            .field("validators", &self.validators)
            .finish()
    }
}

/// Member kind a mixin main method contributes, read from its contributing facet.
fn contributed_feature_type(main: &FacetedMethod) -> FeatureType {
    match main.get_facet(facet_type::CONTRIBUTING).and_then(Facet::as_text) {
        Some("property") => FeatureType::Property,
        Some("collection") => FeatureType::Collection,
        _ => FeatureType::Action,
    }
}

/// Adds each mixin's main method to its mixee as a mixed-in member.
fn contribute_mixins(specs: &mut BTreeMap<String, ObjectSpecification>) {
    let mut contributions = Vec::new();
    let mut dropped: Vec<(String, String)> = Vec::new();
    for mixin in specs.values().filter(|spec| spec.bean_sort().is_mixin()) {
        match mixin_contribution(mixin) {
            Ok(contribution) => contributions.push(contribution),
            Err(reason) => dropped.push((mixin.type_name().to_string(), reason)),
        }
    }

    for (mixee, member) in contributions {
        match specs.get_mut(&mixee) {
            Some(target) if target.bean_sort().introspects_members() => {
                tracing::debug!(
                    mixee = %mixee,
                    member = %member.identifier(),
                    feature_type = %member.feature_type(),
                    "mixin contributed"
                );
                target.add_member(member);
            }
            _ => dropped.push((
                member.mixed_in_from().unwrap_or_default().to_string(),
                format!("mixee {mixee} is not an introspected type of the metamodel"),
            )),
        }
    }

    for (mixin, reason) in dropped {
        tracing::warn!(mixin = %mixin, reason = %reason, "mixin contribution dropped");
        if let Some(spec) = specs.get_mut(&mixin) {
            spec.record_metadata_error(&format!("mixin contributes nothing: {reason}"));
        }
    }
}

/// The member `mixin` contributes, keyed by its mixee.
fn mixin_contribution(mixin: &ObjectSpecification) -> Result<(String, FacetedMethod), String> {
    let Some((mixee, main)) = mixin.descriptor().mixin() else {
        return Err("no mixee declared with @Mixin(mixee)".to_string());
    };
    let main_member = mixin
        .actions()
        .find(|action| action.method().name == main)
        .ok_or_else(|| format!("main method '{main}' not found"))?;
    let member_name = naming::mixin_member_name(mixin.type_name());
    let contributed = main_member.mixed_into(
        mixin.type_name(),
        mixee,
        &member_name,
        contributed_feature_type(main_member),
    );
    Ok((mixee.to_string(), contributed))
}
