//! Classification of introspected classes.

use crate::context::ValueTypeRegistry;
use crate::descriptor::{ClassDescriptor, TypeRef, annotation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeanSort {
    Value,
    ViewModel,
    Entity,
    Mixin,
    ManagedBean,
    Abstract,
    Collection,
    Unknown,
}

impl BeanSort {
    pub fn classify(class: &ClassDescriptor, value_types: &ValueTypeRegistry) -> Self {
        if TypeRef::new(class.name.as_str()).is_collection() {
            return BeanSort::Collection;
        }
        if class.has_annotation(annotation::VALUE) || value_types.contains(&class.name) {
            return BeanSort::Value;
        }
        if class.mixin().is_some() {
            return BeanSort::Mixin;
        }
        if class.has_annotation(annotation::DOMAIN_SERVICE) {
            return BeanSort::ManagedBean;
        }
        if let Some(domain_object) = class.annotation(annotation::DOMAIN_OBJECT) {
            if class.is_abstract {
                return BeanSort::Abstract;
            }
            return match domain_object.attr_str("nature") {
                Some("ENTITY") => BeanSort::Entity,
                Some("MIXIN") => BeanSort::Mixin,
                _ => BeanSort::ViewModel,
            };
        }
        if class.is_abstract {
            return BeanSort::Abstract;
        }
        BeanSort::Unknown
    }

    /// Whether members of this sort are introspected at all.
    pub fn introspects_members(self) -> bool {
        !matches!(
            self,
            BeanSort::Value | BeanSort::Collection | BeanSort::Unknown
        )
    }

    pub fn is_mixin(self) -> bool {
        self == BeanSort::Mixin
    }

    pub fn is_unknown(self) -> bool {
        self == BeanSort::Unknown
    }
}
