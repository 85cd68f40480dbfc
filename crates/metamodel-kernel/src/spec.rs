//! Concrete facet holders: object specifications, members and parameters.

use crate::bean_sort::BeanSort;
use crate::descriptor::{ClassDescriptor, MethodDescriptor, ParameterDescriptor};
use crate::facet::{Facet, facet_type};
use crate::feature::FeatureType;
use crate::holder::{FacetHolder, FacetMap};
use crate::identifier::Identifier;
use crate::naming;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetedMethodParameter {
    identifier: Identifier,
    feature_type: FeatureType,
    index: usize,
    #[serde(skip)]
    descriptor: ParameterDescriptor,
    #[serde(flatten)]
    facets: FacetMap,
}

impl FacetedMethodParameter {
    fn new(action: &Identifier, index: usize, descriptor: ParameterDescriptor) -> Self {
        let feature_type = if descriptor.type_ref.is_collection() {
            FeatureType::ActionParameterCollection
        } else {
            FeatureType::ActionParameterScalar
        };
        Self {
            identifier: action.parameter_identifier(index),
            feature_type,
            index,
            descriptor,
            facets: FacetMap::new(),
        }
    }

    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn descriptor(&self) -> &ParameterDescriptor {
        &self.descriptor
    }
}

impl FacetHolder for FacetedMethodParameter {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
    fn facet_map(&self) -> &FacetMap {
        &self.facets
    }
    fn facet_map_mut(&mut self) -> &mut FacetMap {
        &mut self.facets
    }
}

/// A property, collection or action together with the method that backs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetedMethod {
    identifier: Identifier,
    feature_type: FeatureType,
    #[serde(skip)]
    method: MethodDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    mixed_in_from: Option<String>,
    #[serde(flatten)]
    facets: FacetMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<FacetedMethodParameter>,
}

impl FacetedMethod {
    /// A property or collection backed by accessor `method`.
    pub fn for_association(
        class_name: &str,
        method: MethodDescriptor,
        feature_type: FeatureType,
    ) -> Self {
        let member_name = naming::accessor_member_name(&method.name);
        Self {
            identifier: Identifier::property_or_collection_identifier(class_name, member_name),
            feature_type,
            method,
            mixed_in_from: None,
            facets: FacetMap::new(),
            parameters: Vec::new(),
        }
    }

    pub fn for_action(class_name: &str, method: MethodDescriptor) -> Self {
        let identifier =
            Identifier::action_identifier(class_name, method.name.clone(), method.parameter_types());
        let parameters = method
            .parameters
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, parameter)| FacetedMethodParameter::new(&identifier, index, parameter))
            .collect();
        Self {
            identifier,
            feature_type: FeatureType::Action,
            method,
            mixed_in_from: None,
            facets: FacetMap::new(),
            parameters,
        }
    }

    /// A copy of this mixin main method contributed to `mixee` as `member_name`.
    pub fn mixed_into(
        &self,
        mixin_type: &str,
        mixee: &str,
        member_name: &str,
        feature_type: FeatureType,
    ) -> Self {
        let identifier = match feature_type {
            FeatureType::Action => self.identifier.with_class(mixee, member_name),
            _ => Identifier::property_or_collection_identifier(mixee, member_name),
        };
        let mut facets = self.facets.clone();
        facets.rebind(&identifier);
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| {
                let mut parameter = parameter.clone();
                parameter.identifier = identifier.parameter_identifier(parameter.index);
                parameter.facets.rebind(&parameter.identifier);
                parameter
            })
            .collect();
        Self {
            identifier,
            feature_type,
            method: self.method.clone(),
            mixed_in_from: Some(mixin_type.to_string()),
            facets,
            parameters,
        }
    }

    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Logical member name shown to users.
    pub fn name(&self) -> &str {
        self.identifier.logical_member_name()
    }

    pub fn is_mixed_in(&self) -> bool {
        self.mixed_in_from.is_some()
    }

    pub fn mixed_in_from(&self) -> Option<&str> {
        self.mixed_in_from.as_deref()
    }

    pub fn parameters(&self) -> &[FacetedMethodParameter] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut [FacetedMethodParameter] {
        &mut self.parameters
    }

    /// Backing method alongside mutable parameters, for parameter processing.
    pub fn split_parameters_mut(&mut self) -> (&MethodDescriptor, &mut [FacetedMethodParameter]) {
        (&self.method, &mut self.parameters)
    }
}

impl FacetHolder for FacetedMethod {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
    fn facet_map(&self) -> &FacetMap {
        &self.facets
    }
    fn facet_map_mut(&mut self) -> &mut FacetMap {
        &mut self.facets
    }
}

/// Object-level holder: the metamodel of one class and its members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpecification {
    identifier: Identifier,
    bean_sort: BeanSort,
    #[serde(skip)]
    descriptor: ClassDescriptor,
    #[serde(flatten)]
    facets: FacetMap,
    members: Vec<FacetedMethod>,
}

impl ObjectSpecification {
    pub fn new(descriptor: ClassDescriptor, bean_sort: BeanSort) -> Self {
        Self {
            identifier: Identifier::class_identifier(descriptor.name.clone()),
            bean_sort,
            descriptor,
            facets: FacetMap::new(),
            members: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        self.identifier.class_name()
    }

    /// Stable, serializable type name: the logical type facet, else the class name.
    pub fn logical_type_name(&self) -> &str {
        self.get_facet(facet_type::LOGICAL_TYPE)
            .and_then(Facet::as_text)
            .unwrap_or_else(|| self.type_name())
    }

    pub fn bean_sort(&self) -> BeanSort {
        self.bean_sort
    }

    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    pub fn members(&self) -> &[FacetedMethod] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [FacetedMethod] {
        &mut self.members
    }

    pub fn add_member(&mut self, member: FacetedMethod) {
        self.members.push(member);
    }

    pub fn member(&self, name: &str) -> Option<&FacetedMethod> {
        self.members.iter().find(|member| member.name() == name)
    }

    fn members_of(&self, feature_type: FeatureType) -> impl Iterator<Item = &FacetedMethod> {
        self.members
            .iter()
            .filter(move |member| member.feature_type() == feature_type)
    }

    pub fn properties(&self) -> impl Iterator<Item = &FacetedMethod> {
        self.members_of(FeatureType::Property)
    }

    pub fn collections(&self) -> impl Iterator<Item = &FacetedMethod> {
        self.members_of(FeatureType::Collection)
    }

    pub fn associations(&self) -> impl Iterator<Item = &FacetedMethod> {
        self.members
            .iter()
            .filter(|member| member.feature_type().is_property_or_collection())
    }

    pub fn actions(&self) -> impl Iterator<Item = &FacetedMethod> {
        self.members_of(FeatureType::Action)
    }
}

impl FacetHolder for ObjectSpecification {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
    fn facet_map(&self) -> &FacetMap {
        &self.facets
    }
    fn facet_map_mut(&mut self) -> &mut FacetMap {
        &mut self.facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{FacetValue, Precedence};

    #[test]
    fn action_parameters_get_indexed_identifiers() {
        let method = MethodDescriptor::new("placeOrder")
            .param(ParameterDescriptor::new("product", "dom.Product"))
            .param(ParameterDescriptor::new("tags", "java.util.List<dom.Tag>"));
        let action = FacetedMethod::for_action("dom.Customer", method);
        assert_eq!(action.name(), "placeOrder");
        assert_eq!(action.parameters().len(), 2);
        assert_eq!(
            action.parameters()[1].identifier().to_string(),
            "dom.Customer#placeOrder(dom.Product,java.util.List<dom.Tag>)[1]"
        );
        assert_eq!(
            action.parameters()[1].feature_type(),
            FeatureType::ActionParameterCollection
        );
    }

    #[test]
    fn mixed_in_members_are_rebound_to_the_mixee() {
        let mut main = FacetedMethod::for_action(
            "dom.Customer_notes",
            MethodDescriptor::new("act").returning("java.lang.String"),
        );
        main.add_facet(Facet::new(
            facet_type::NAMED,
            Precedence::Explicit,
            FacetValue::Text("Notes".into()),
        ));
        let contributed =
            main.mixed_into("dom.Customer_notes", "dom.Customer", "notes", FeatureType::Property);
        assert_eq!(contributed.identifier().to_string(), "dom.Customer#notes");
        assert_eq!(contributed.mixed_in_from(), Some("dom.Customer_notes"));
        let named = contributed.get_facet(facet_type::NAMED).expect("facet copied");
        assert_eq!(named.holder(), Some(contributed.identifier()));
    }

    #[test]
    fn logical_type_name_falls_back_to_class_name() {
        let mut spec =
            ObjectSpecification::new(ClassDescriptor::new("dom.Customer"), BeanSort::Entity);
        assert_eq!(spec.logical_type_name(), "dom.Customer");
        spec.add_facet(Facet::new(
            facet_type::LOGICAL_TYPE,
            Precedence::Explicit,
            FacetValue::Text("crm.Customer".into()),
        ));
        assert_eq!(spec.logical_type_name(), "crm.Customer");
    }
}
