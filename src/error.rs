use thiserror::Error;

use crate::model::{ChunkCoord, TerritoryId, TownId};

/// Fatal errors: configuration problems that abort a build/load wholesale,
/// plus parse/io failures surfaced from documents and snapshots.
///
/// Build errors never partially apply; the previously compiled world is
/// left untouched when one is returned.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("duplicate resource node '{0}'")]
    DuplicateResourceNode(String),

    #[error("territory {territory} references unknown resource node '{name}'")]
    UnknownResourceNode {
        territory: TerritoryId,
        name: String,
    },

    #[error("territory {territory} is malformed: {reason}")]
    MalformedTerritory {
        territory: TerritoryId,
        reason: String,
    },

    #[error("chunk {chunk} claimed by both territory {first} and territory {second}")]
    ChunkOverlap {
        chunk: ChunkCoord,
        first: TerritoryId,
        second: TerritoryId,
    },

    #[error("expected a '{expected}' document, found '{found}'")]
    DocumentType {
        expected: &'static str,
        found: String,
    },

    #[error("sampler weight {0} is negative")]
    NegativeWeight(f64),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("document parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable precondition failures from the ownership state machine.
///
/// Operations returning one of these have not mutated any state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("territory {0} does not exist")]
    UnknownTerritory(TerritoryId),

    #[error("town {0} does not exist")]
    UnknownTown(TownId),

    #[error("resident {0} is not registered")]
    UnknownResident(String),

    #[error("town name '{0}' is already taken")]
    TownNameTaken(String),

    #[error("territory {0} is already claimed")]
    AlreadyClaimed(TerritoryId),

    #[error("territory {0} is not adjacent to any territory of the town")]
    NotConnected(TerritoryId),

    #[error("claim cost {cost} exceeds available claim power {available}")]
    OverBudget { cost: i64, available: i64 },

    #[error("territory {0} is not owned by this town")]
    NotOwner(TerritoryId),

    #[error("territory {0} has no owner")]
    Unowned(TerritoryId),

    #[error("home territory {0} cannot be unclaimed")]
    HomeTerritory(TerritoryId),

    #[error("territory {0} is not occupied by this town")]
    NotOccupier(TerritoryId),

    #[error("town already owns territory {0}")]
    AlreadyOwner(TerritoryId),
}
