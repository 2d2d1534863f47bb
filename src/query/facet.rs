//! Exact-value facet constraints over enumerated attributes.

use std::collections::BTreeMap;

use super::Record;

/// Sentinel facet value meaning "no constraint", as offered by list screens.
pub const ANY: &str = "All";

/// A single facet constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Facet {
    /// No constraint.
    #[default]
    Any,
    /// The attribute must equal this value exactly.
    Exactly(String),
}

impl Facet {
    /// Parses a selector value; [`ANY`] maps to [`Facet::Any`].
    pub fn parse(value: &str) -> Self {
        if value == ANY {
            Self::Any
        } else {
            Self::Exactly(value.to_string())
        }
    }

    fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(required) => value == Some(required.as_str()),
        }
    }
}

/// A set of facet constraints keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Facets(BTreeMap<String, Facet>);

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Facets::set`] constraining `name` to exactly `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, Facet::Exactly(value.into()));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, facet: Facet) {
        self.0.insert(name.into(), facet);
    }

    pub fn get(&self, name: &str) -> &Facet {
        self.0.get(name).unwrap_or(&Facet::Any)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Facet)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when no facet carries a constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.0.values().all(|f| *f == Facet::Any)
    }
}

/// True when every constrained facet equals the record's attribute.
///
/// A constrained facet naming an attribute the record lacks never matches.
pub fn matches<R: Record + ?Sized>(record: &R, facets: &Facets) -> bool {
    facets
        .iter()
        .all(|(name, facet)| facet.admits(record.field(name)))
}
