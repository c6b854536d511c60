use serde::{Serialize, Serializer};
use std::fmt;

/// Partition key for measurement scopes: the engagement-wide `GLOBAL` scope
/// or a single organizational unit. One dimension, no hierarchy; a unit miss
/// yields an empty series rather than falling back to `GLOBAL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    Global,
    Unit(String),
}

impl ScopeKey {
    /// Canonical resolution from an optional unit identifier. Blank and
    /// whitespace-only identifiers resolve to the global scope.
    pub fn resolve(unit_id: Option<&str>) -> Self {
        match unit_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::Unit(id.to_string()),
            None => Self::Global,
        }
    }

    pub fn unit_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Unit(id) => Some(id),
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("GLOBAL"),
            Self::Unit(id) => write!(f, "UNIT:{id}"),
        }
    }
}

impl Serialize for ScopeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
