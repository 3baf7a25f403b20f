use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::nation::NationId;
use super::territory::TerritoryId;

/// Town identifier from the engine's shared [`crate::id::IdGenerator`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TownId(pub u64);

impl fmt::Display for TownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A town: the owning unit of the claims economy.
///
/// Invariant: `claims_used == Σ cost(t) for t in territories \ annexed`,
/// maintained by every ownership operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Town {
    pub id: TownId,
    pub name: String,
    pub uuid: String,
    pub color: i32,
    pub leader: Option<String>,
    pub officers: BTreeSet<String>,
    pub residents: BTreeSet<String>,
    pub territories: BTreeSet<TerritoryId>,
    /// Zero-cost territories acquired by annexation; subset of `territories`.
    pub annexed: BTreeSet<TerritoryId>,
    /// Other towns' territories this town currently occupies.
    pub captured: BTreeSet<TerritoryId>,
    pub home: TerritoryId,
    pub nation: Option<NationId>,
    pub allies: BTreeSet<TownId>,
    pub enemies: BTreeSet<TownId>,
    pub truce: BTreeSet<TownId>,
    pub claims_used: i64,
    pub claims_max: i64,
    pub claims_bonus: i64,
    pub claims_penalty: i64,
    /// Claim power lost to territories annexed away from this town.
    pub claims_annexed: i64,
    /// Elapsed-time accumulator for penalty decay.
    pub claims_penalty_time: f64,
    pub is_over_claims_max: bool,
}

impl Town {
    pub fn new(id: TownId, name: impl Into<String>, uuid: impl Into<String>, home: TerritoryId) -> Self {
        Self {
            id,
            name: name.into(),
            uuid: uuid.into(),
            color: 0,
            leader: None,
            officers: BTreeSet::new(),
            residents: BTreeSet::new(),
            territories: BTreeSet::new(),
            annexed: BTreeSet::new(),
            captured: BTreeSet::new(),
            home,
            nation: None,
            allies: BTreeSet::new(),
            enemies: BTreeSet::new(),
            truce: BTreeSet::new(),
            claims_used: 0,
            claims_max: 0,
            claims_bonus: 0,
            claims_penalty: 0,
            claims_annexed: 0,
            claims_penalty_time: 0.0,
            is_over_claims_max: false,
        }
    }

    /// Claim power still available for new claims.
    pub fn claims_available(&self) -> i64 {
        self.claims_max - self.claims_used
    }
}

/// A player record contributing claim power to their town.
#[derive(Debug, Clone, PartialEq)]
pub struct Resident {
    pub uuid: String,
    pub name: String,
    pub town: Option<TownId>,
    /// Claim power contribution to the resident's town.
    pub claims: i64,
    /// Elapsed-time accumulator for the power ramp.
    pub claims_time: f64,
}

impl Resident {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, claims: i64) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            town: None,
            claims,
            claims_time: 0.0,
        }
    }
}
