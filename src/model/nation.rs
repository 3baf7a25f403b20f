use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::town::TownId;

/// Nation identifier from the engine's shared [`crate::id::IdGenerator`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NationId(pub u64);

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A nation: a set of towns with a capital. Member links are town ids
/// resolved through the town arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Nation {
    pub id: NationId,
    pub name: String,
    pub uuid: String,
    pub capital: TownId,
    pub color: i32,
    pub towns: BTreeSet<TownId>,
}

impl Nation {
    pub fn new(id: NationId, name: impl Into<String>, uuid: impl Into<String>, capital: TownId) -> Self {
        let mut towns = BTreeSet::new();
        towns.insert(capital);
        Self {
            id,
            name: name.into(),
            uuid: uuid.into(),
            capital,
            color: 0,
            towns,
        }
    }
}
