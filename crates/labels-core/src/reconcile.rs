//! Three-way comparison of a source and a destination collection.
//!
//! A name lands in at most one of the three results: `missing` holds names
//! only the source has, `bad` names only the destination has, and `wrong`
//! names both have with different attributes.

use crate::models::LabelCollection;

/// Labels of `source` whose name is absent from `destination`, with source attributes
pub fn missing(source: &LabelCollection, destination: &LabelCollection) -> LabelCollection {
    source
        .iter()
        .filter(|(name, _)| !destination.contains(name))
        .map(|(name, attrs)| (name.clone(), attrs.clone()))
        .collect()
}

/// Labels present in both whose color or description differ, with source attributes
pub fn wrong(source: &LabelCollection, destination: &LabelCollection) -> LabelCollection {
    source
        .iter()
        .filter(|(name, attrs)| destination.get(name).is_some_and(|dst| dst != *attrs))
        .map(|(name, attrs)| (name.clone(), attrs.clone()))
        .collect()
}

/// Labels of `destination` whose name is absent from `source`, with destination attributes
pub fn bad(source: &LabelCollection, destination: &LabelCollection) -> LabelCollection {
    missing(destination, source)
}

/// All three derived collections for one (source, destination) pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub missing: LabelCollection,
    pub wrong: LabelCollection,
    pub bad: LabelCollection,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.wrong.is_empty() && self.bad.is_empty()
    }
}

pub fn reconcile(source: &LabelCollection, destination: &LabelCollection) -> Reconciliation {
    Reconciliation {
        missing: missing(source, destination),
        wrong: wrong(source, destination),
        bad: bad(source, destination),
    }
}
