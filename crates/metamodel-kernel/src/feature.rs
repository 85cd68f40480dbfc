//! Feature types: what kind of reflective feature a factory or context targets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Object,
    Property,
    Collection,
    Action,
    ActionParameterScalar,
    ActionParameterCollection,
}

impl FeatureType {
    pub const ALL: [FeatureType; 6] = [
        FeatureType::Object,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::ActionParameterScalar,
        FeatureType::ActionParameterCollection,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn is_property_or_collection(self) -> bool {
        matches!(self, FeatureType::Property | FeatureType::Collection)
    }

    pub fn is_action_parameter(self) -> bool {
        matches!(
            self,
            FeatureType::ActionParameterScalar | FeatureType::ActionParameterCollection
        )
    }

    pub fn is_member(self) -> bool {
        self.is_property_or_collection() || self == FeatureType::Action
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureType::Object => "object",
            FeatureType::Property => "property",
            FeatureType::Collection => "collection",
            FeatureType::Action => "action",
            FeatureType::ActionParameterScalar => "action_parameter_scalar",
            FeatureType::ActionParameterCollection => "action_parameter_collection",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of [`FeatureType`]s a factory declares at construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureTypes(u8);

impl FeatureTypes {
    pub const NONE: Self = Self(0);
    pub const OBJECTS_ONLY: Self = Self::of(&[FeatureType::Object]);
    pub const PROPERTIES_ONLY: Self = Self::of(&[FeatureType::Property]);
    pub const COLLECTIONS_ONLY: Self = Self::of(&[FeatureType::Collection]);
    pub const ACTIONS_ONLY: Self = Self::of(&[FeatureType::Action]);
    pub const PARAMETERS_ONLY: Self = Self::of(&[
        FeatureType::ActionParameterScalar,
        FeatureType::ActionParameterCollection,
    ]);
    pub const PROPERTIES_AND_COLLECTIONS: Self =
        Self::of(&[FeatureType::Property, FeatureType::Collection]);
    pub const MEMBERS: Self = Self::of(&[
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
    ]);
    pub const PROPERTIES_AND_ACTIONS: Self =
        Self::of(&[FeatureType::Property, FeatureType::Action]);
    pub const ACTIONS_AND_PARAMETERS: Self = Self::ACTIONS_ONLY.union(Self::PARAMETERS_ONLY);
    pub const EVERYTHING_BUT_PARAMETERS: Self = Self::OBJECTS_ONLY.union(Self::MEMBERS);
    pub const EVERYTHING: Self = Self::EVERYTHING_BUT_PARAMETERS.union(Self::PARAMETERS_ONLY);

    pub const fn of(types: &[FeatureType]) -> Self {
        let mut bits = 0u8;
        let mut idx = 0;
        while idx < types.len() {
            bits |= types[idx].bit();
            idx += 1;
        }
        Self(bits)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, feature_type: FeatureType) -> bool {
        self.0 & feature_type.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = FeatureType> {
        FeatureType::ALL
            .into_iter()
            .filter(move |feature_type| self.contains(*feature_type))
    }
}

impl fmt::Debug for FeatureTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
