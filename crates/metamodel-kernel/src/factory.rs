//! The facet factory contract.
//!
//! A factory declares the [`FeatureTypes`] it applies to and is called back
//! once per class, member or parameter of those kinds. Optional capabilities
//! are declared up front through [`Capabilities`]; the processor reads them
//! once at `init` and consults only the resulting tables afterwards.

use crate::context::MetaModelContext;
use crate::descriptor::{ClassDescriptor, MethodDescriptor};
use crate::error::{MetamodelError, short_type_name};
use crate::facet::{Facet, Resolution};
use crate::feature::{FeatureType, FeatureTypes};
use crate::holder::FacetHolder;
use crate::spec::{FacetedMethod, FacetedMethodParameter, ObjectSpecification};
use crate::validation::ValidatorComposite;

/// Claims methods out of the pool of a class still awaiting classification.
pub trait MethodRemover {
    /// Removes and returns every remaining method matching `predicate`.
    fn remove_methods(
        &mut self,
        predicate: &dyn Fn(&MethodDescriptor) -> bool,
    ) -> Vec<MethodDescriptor>;

    /// Removes the method with the same signature as `method`, if still present.
    fn remove_method(&mut self, method: &MethodDescriptor) -> bool;

    fn remove_methods_named(&mut self, name: &str) -> Vec<MethodDescriptor> {
        self.remove_methods(&|method| method.name == name)
    }
}

/// A custom predicate marking methods as metamodel plumbing.
pub trait MethodFilteringFacetFactory {
    fn recognizes(&self, method: &MethodDescriptor) -> bool;
}

/// Identifies property and collection accessors so they can be claimed
/// before actions are detected among the remaining methods.
pub trait PropertyOrCollectionIdentifyingFacetFactory {
    fn is_property_or_collection_getter(&self, method: &MethodDescriptor) -> bool;

    fn is_collection_accessor(&self, method: &MethodDescriptor) -> bool;

    fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    );

    fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<MethodDescriptor>,
    );
}

/// Installs the stable, serializable logical type name of a class.
///
/// Runs before any other object-level factory.
pub trait ObjectSpecIdFacetFactory {
    fn process_object_spec_id(
        &self,
        ctx: &mut ProcessClassContext<'_>,
    ) -> Result<(), MetamodelError>;
}

/// Contributes validators when the programming model is initialized.
pub trait MetaModelRefiner {
    fn refine_programming_model(&self, validators: &mut ValidatorComposite);
}

/// The capability table of one factory.
#[derive(Clone, Copy, Default)]
pub struct Capabilities<'a> {
    pub method_prefixes: &'a [&'static str],
    pub method_filtering: Option<&'a dyn MethodFilteringFacetFactory>,
    pub property_or_collection_identifying:
        Option<&'a dyn PropertyOrCollectionIdentifyingFacetFactory>,
    pub object_spec_id: Option<&'a dyn ObjectSpecIdFacetFactory>,
    pub validator_refiner: Option<&'a dyn MetaModelRefiner>,
}

impl<'a> Capabilities<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    /// Method name prefixes this factory treats as supporting methods.
    pub fn with_method_prefixes(mut self, prefixes: &'a [&'static str]) -> Self {
        self.method_prefixes = prefixes;
        self
    }

    pub fn with_method_filtering(mut self, factory: &'a dyn MethodFilteringFacetFactory) -> Self {
        self.method_filtering = Some(factory);
        self
    }

    pub fn with_property_or_collection_identifying(
        mut self,
        factory: &'a dyn PropertyOrCollectionIdentifyingFacetFactory,
    ) -> Self {
        self.property_or_collection_identifying = Some(factory);
        self
    }

    pub fn with_object_spec_id(mut self, factory: &'a dyn ObjectSpecIdFacetFactory) -> Self {
        self.object_spec_id = Some(factory);
        self
    }

    pub fn with_validator_refiner(mut self, factory: &'a dyn MetaModelRefiner) -> Self {
        self.validator_refiner = Some(factory);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.method_prefixes.is_empty()
            && self.method_filtering.is_none()
            && self.property_or_collection_identifying.is_none()
            && self.object_spec_id.is_none()
            && self.validator_refiner.is_none()
    }
}

/// A stateless strategy contributing facets.
///
/// Factories return `Err` only for defects in the factory itself. Malformed
/// domain metadata is recorded with [`Facet::with_metadata_error`] instead.
pub trait FacetFactory: Send + Sync + 'static {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn feature_types(&self) -> FeatureTypes;

    fn process_class(&self, _ctx: &mut ProcessClassContext<'_>) -> Result<(), MetamodelError> {
        Ok(())
    }

    fn process_method(&self, _ctx: &mut ProcessMethodContext<'_>) -> Result<(), MetamodelError> {
        Ok(())
    }

    fn process_params(
        &self,
        _ctx: &mut ProcessParameterContext<'_>,
    ) -> Result<(), MetamodelError> {
        Ok(())
    }

    fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::none()
    }
}

/// Context for object-level processing.
pub struct ProcessClassContext<'a> {
    class: &'a ClassDescriptor,
    remover: &'a mut dyn MethodRemover,
    spec: &'a mut ObjectSpecification,
    context: &'a MetaModelContext,
}

impl<'a> ProcessClassContext<'a> {
    pub fn new(
        class: &'a ClassDescriptor,
        remover: &'a mut dyn MethodRemover,
        spec: &'a mut ObjectSpecification,
        context: &'a MetaModelContext,
    ) -> Self {
        Self {
            class,
            remover,
            spec,
            context,
        }
    }

    pub fn class(&self) -> &'a ClassDescriptor {
        self.class
    }

    pub fn remover(&mut self) -> &mut dyn MethodRemover {
        &mut *self.remover
    }

    pub fn holder(&self) -> &ObjectSpecification {
        &*self.spec
    }

    pub fn holder_mut(&mut self) -> &mut ObjectSpecification {
        &mut *self.spec
    }

    pub fn add_facet(&mut self, facet: Facet) -> Resolution {
        self.spec.add_facet(facet)
    }

    pub fn meta_model_context(&self) -> &'a MetaModelContext {
        self.context
    }
}

/// Context for member-level processing of a property, collection or action.
pub struct ProcessMethodContext<'a> {
    class: &'a ClassDescriptor,
    method: &'a MethodDescriptor,
    feature_type: FeatureType,
    is_mixin_main: bool,
    remover: &'a mut dyn MethodRemover,
    member: &'a mut FacetedMethod,
    context: &'a MetaModelContext,
}

impl<'a> ProcessMethodContext<'a> {
    pub fn new(
        class: &'a ClassDescriptor,
        method: &'a MethodDescriptor,
        feature_type: FeatureType,
        is_mixin_main: bool,
        remover: &'a mut dyn MethodRemover,
        member: &'a mut FacetedMethod,
        context: &'a MetaModelContext,
    ) -> Self {
        Self {
            class,
            method,
            feature_type,
            is_mixin_main,
            remover,
            member,
            context,
        }
    }

    pub fn class(&self) -> &'a ClassDescriptor {
        self.class
    }

    pub fn method(&self) -> &'a MethodDescriptor {
        self.method
    }

    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    /// Whether this is the main method of a mixin class.
    pub fn is_mixin_main(&self) -> bool {
        self.is_mixin_main
    }

    pub fn remover(&mut self) -> &mut dyn MethodRemover {
        &mut *self.remover
    }

    pub fn holder(&self) -> &FacetedMethod {
        &*self.member
    }

    pub fn holder_mut(&mut self) -> &mut FacetedMethod {
        &mut *self.member
    }

    pub fn add_facet(&mut self, facet: Facet) -> Resolution {
        self.member.add_facet(facet)
    }

    pub fn meta_model_context(&self) -> &'a MetaModelContext {
        self.context
    }
}

/// Context for processing one action parameter.
pub struct ProcessParameterContext<'a> {
    class: &'a ClassDescriptor,
    method: &'a MethodDescriptor,
    param_index: usize,
    remover: &'a mut dyn MethodRemover,
    parameter: &'a mut FacetedMethodParameter,
    context: &'a MetaModelContext,
}

impl<'a> ProcessParameterContext<'a> {
    pub fn new(
        class: &'a ClassDescriptor,
        method: &'a MethodDescriptor,
        param_index: usize,
        remover: &'a mut dyn MethodRemover,
        parameter: &'a mut FacetedMethodParameter,
        context: &'a MetaModelContext,
    ) -> Self {
        Self {
            class,
            method,
            param_index,
            remover,
            parameter,
            context,
        }
    }

    pub fn class(&self) -> &'a ClassDescriptor {
        self.class
    }

    pub fn method(&self) -> &'a MethodDescriptor {
        self.method
    }

    pub fn param_index(&self) -> usize {
        self.param_index
    }

    pub fn feature_type(&self) -> FeatureType {
        self.parameter.feature_type()
    }

    pub fn remover(&mut self) -> &mut dyn MethodRemover {
        &mut *self.remover
    }

    pub fn holder(&self) -> &FacetedMethodParameter {
        &*self.parameter
    }

    pub fn holder_mut(&mut self) -> &mut FacetedMethodParameter {
        &mut *self.parameter
    }

    pub fn add_facet(&mut self, facet: Facet) -> Resolution {
        self.parameter.add_facet(facet)
    }

    pub fn meta_model_context(&self) -> &'a MetaModelContext {
        self.context
    }
}
