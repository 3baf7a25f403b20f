pub mod config;
pub mod doc;
pub mod error;
pub mod graph;
pub mod id;
pub mod model;
pub mod sampler;
pub mod state;
pub mod testutil;

pub use config::EngineConfig;
pub use error::{ClaimError, EngineError};
pub use id::IdGenerator;
pub use model::{
    AnimalKind, ChunkCoord, ItemKind, Nation, NationId, NodeRegistry, OreDeposit, Resident,
    ResourceNode, ResourceProfile, Territory, TerritoryId, TerritoryRaw, Town, TownId,
};
pub use sampler::{OreDrop, OreTable, WeightedSampler};
pub use state::WorldState;
