use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deposit::OreDeposit;
use super::kind::{AnimalKind, ItemKind};
use super::town::TownId;

/// Territory identifier, fixed by the world document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TerritoryId(pub u32);

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Map chunk coordinate (16×16 block column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Raw territory record as read from the world document, before resource
/// profiles are composed. Immutable input to the graph builder.
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryRaw {
    pub id: TerritoryId,
    pub name: String,
    /// Block coordinate of the core marker.
    pub core: (i32, i32),
    pub core_chunk: ChunkCoord,
    pub chunks: BTreeSet<ChunkCoord>,
    pub neighbors: BTreeSet<TerritoryId>,
    pub borders_wilderness: bool,
    /// Assigned resource node names in document order (unsorted).
    pub node_names: Vec<String>,
    pub color: i32,
}

/// Compiled territory: raw record plus composed resource profile, claim
/// cost, and ownership links (arena ids, never references).
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub core: (i32, i32),
    pub core_chunk: ChunkCoord,
    pub chunks: BTreeSet<ChunkCoord>,
    pub neighbors: BTreeSet<TerritoryId>,
    pub borders_wilderness: bool,
    /// Assigned node names sorted by priority ascending.
    pub node_names: Vec<String>,
    pub color: i32,
    pub cost: i64,
    pub income: BTreeMap<ItemKind, f64>,
    pub ores: BTreeMap<ItemKind, OreDeposit>,
    pub crops: BTreeMap<ItemKind, f64>,
    pub animals: BTreeMap<AnimalKind, f64>,
    pub custom_properties: BTreeMap<String, Value>,
    pub town: Option<TownId>,
    pub occupier: Option<TownId>,
}

impl Territory {
    /// View of this territory as a raw record, used when a partial rebuild
    /// needs untouched territories as working-set context.
    pub fn to_raw(&self) -> TerritoryRaw {
        TerritoryRaw {
            id: self.id,
            name: self.name.clone(),
            core: self.core,
            core_chunk: self.core_chunk,
            chunks: self.chunks.clone(),
            neighbors: self.neighbors.clone(),
            borders_wilderness: self.borders_wilderness,
            node_names: self.node_names.clone(),
            color: self.color,
        }
    }
}
