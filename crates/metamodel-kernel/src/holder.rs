//! Facet holders: metamodel elements carrying one active facet per type.

use crate::facet::{Facet, FacetType, Resolution, resolve};
use crate::identifier::Identifier;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map::Values;

/// Storage behind every [`FacetHolder`]: one slot per facet type.
///
/// Metadata errors are kept apart from the slots. A malformed annotation is
/// still reported when its facet loses the slot to a higher precedence one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetMap {
    slots: BTreeMap<FacetType, Facet>,
    metadata_errors: Vec<String>,
}

/// Serialized as `facets` plus `metadataErrors` when there are any; holders
/// flatten it into their own record.
impl Serialize for FacetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("facets", &self.slots)?;
        if !self.metadata_errors.is_empty() {
            map.serialize_entry("metadataErrors", &self.metadata_errors)?;
        }
        map.end()
    }
}

impl FacetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, facet_type: FacetType) -> Option<&Facet> {
        self.slots.get(&facet_type)
    }

    /// Offers `facet` to its slot, binding it to `holder` if it is accepted.
    pub fn add(&mut self, holder: &Identifier, mut facet: Facet) -> Resolution {
        if let Some(error) = facet.metadata_error() {
            self.record_metadata_error(error);
        }
        let existing = self.slots.get(&facet.facet_type()).map(Facet::precedence);
        let resolution = resolve(existing, facet.precedence());
        if resolution.is_accepted() {
            facet.bind(holder);
            self.slots.insert(facet.facet_type(), facet);
        }
        resolution
    }

    /// Records a metadata error that no single facet carries.
    pub fn record_metadata_error(&mut self, message: &str) {
        if !self.metadata_errors.iter().any(|known| known == message) {
            self.metadata_errors.push(message.to_string());
        }
    }

    /// Rebinds every facet to `holder`, e.g. when a member is mixed into another type.
    pub fn rebind(&mut self, holder: &Identifier) {
        for facet in self.slots.values_mut() {
            facet.bind(holder);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> Values<'_, FacetType, Facet> {
        self.slots.values()
    }

    /// Every metadata error offered to this map, in arrival order.
    pub fn metadata_errors(&self) -> impl Iterator<Item = &str> {
        self.metadata_errors.iter().map(String::as_str)
    }
}

/// Any metamodel element capable of holding facets.
///
/// Holders are only mutated during single-threaded introspection; afterwards
/// they are read through shared references.
pub trait FacetHolder {
    fn identifier(&self) -> &Identifier;

    fn facet_map(&self) -> &FacetMap;

    fn facet_map_mut(&mut self) -> &mut FacetMap;

    fn get_facet(&self, facet_type: FacetType) -> Option<&Facet> {
        self.facet_map().get(facet_type)
    }

    fn contains_facet(&self, facet_type: FacetType) -> bool {
        self.get_facet(facet_type).is_some()
    }

    /// Installs `facet` unless a facet of higher precedence already occupies its slot.
    fn add_facet(&mut self, facet: Facet) -> Resolution {
        let holder = self.identifier().clone();
        let facet_type = facet.facet_type();
        let resolution = self.facet_map_mut().add(&holder, facet);
        if !resolution.is_accepted() {
            tracing::trace!(%holder, %facet_type, ?resolution, "facet not installed");
        }
        resolution
    }

    fn record_metadata_error(&mut self, message: &str) {
        tracing::debug!(holder = %self.identifier(), message, "metadata error");
        self.facet_map_mut().record_metadata_error(message);
    }

    /// The facet of `facet_type`, unless it is only a framework fallback.
    fn lookup_non_fallback_facet(&self, facet_type: FacetType) -> Option<&Facet> {
        self.get_facet(facet_type).filter(|facet| !facet.is_fallback())
    }

    fn facets(&self) -> Values<'_, FacetType, Facet> {
        self.facet_map().iter()
    }

    /// Metadata errors raised against this holder, including those carried
    /// by facets that were not installed.
    fn metadata_errors(&self) -> Vec<&str> {
        self.facet_map().metadata_errors().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{FacetValue, Precedence, facet_type};

    struct Holder {
        identifier: Identifier,
        facets: FacetMap,
    }

    impl FacetHolder for Holder {
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

    fn holder() -> Holder {
        Holder {
            identifier: Identifier::property_or_collection_identifier("dom.Customer", "name"),
            facets: FacetMap::new(),
        }
    }

    fn css(precedence: Precedence, value: &str) -> Facet {
        Facet::new(
            facet_type::CSS_CLASS_FA,
            precedence,
            FacetValue::Text(value.into()),
        )
    }

    #[test]
    fn lower_precedence_add_is_a_no_op() {
        let mut holder = holder();
        assert_eq!(holder.add_facet(css(Precedence::Explicit, "fa-user")), Resolution::Installed);
        let resolution = holder.add_facet(css(Precedence::Default, "fa-bolt"));
        assert!(!resolution.is_accepted());
        assert_eq!(
            holder.get_facet(facet_type::CSS_CLASS_FA).and_then(Facet::as_text),
            Some("fa-user")
        );
    }

    #[test]
    fn installed_facets_point_back_at_their_holder() {
        let mut holder = holder();
        holder.add_facet(css(Precedence::Fallback, "fa-bolt"));
        let facet = holder.get_facet(facet_type::CSS_CLASS_FA).expect("facet installed");
        assert_eq!(facet.holder(), Some(&holder.identifier));
    }

    #[test]
    fn non_fallback_lookup_ignores_framework_defaults() {
        let mut holder = holder();
        holder.add_facet(css(Precedence::Fallback, "fa-bolt"));
        assert!(holder.contains_facet(facet_type::CSS_CLASS_FA));
        assert!(holder.lookup_non_fallback_facet(facet_type::CSS_CLASS_FA).is_none());

        holder.add_facet(css(Precedence::Default, "fa-star"));
        assert_eq!(
            holder
                .lookup_non_fallback_facet(facet_type::CSS_CLASS_FA)
                .and_then(Facet::as_text),
            Some("fa-star")
        );
    }

    #[test]
    fn metadata_errors_are_collected() {
        let mut holder = holder();
        holder.add_facet(
            Facet::marker(facet_type::HIDDEN, Precedence::Explicit)
                .with_metadata_error("conflicting hidden annotations"),
        );
        assert_eq!(holder.metadata_errors(), vec!["conflicting hidden annotations"]);
    }

    #[test]
    fn metadata_errors_survive_losing_the_slot() {
        let mut holder = holder();
        holder.add_facet(
            Facet::new(facet_type::MANDATORY, Precedence::Default, FacetValue::Flag(true)),
        );
        let resolution = holder.add_facet(
            Facet::new(facet_type::MANDATORY, Precedence::Fallback, FacetValue::Flag(true))
                .with_metadata_error("@Property(optionality) has unknown value 'MAYBE'"),
        );
        assert!(!resolution.is_accepted());
        assert_eq!(
            holder.get_facet(facet_type::MANDATORY).map(Facet::precedence),
            Some(Precedence::Default)
        );
        assert_eq!(
            holder.metadata_errors(),
            vec!["@Property(optionality) has unknown value 'MAYBE'"]
        );

        // replacing the errored facet keeps the error too
        holder.add_facet(
            Facet::marker(facet_type::HIDDEN, Precedence::Fallback)
                .with_metadata_error("@Property(hidden) has unknown value 'SOMETIMES'"),
        );
        holder.add_facet(Facet::marker(facet_type::HIDDEN, Precedence::Explicit));
        assert_eq!(holder.metadata_errors().len(), 2);
    }
}
