pub(crate) mod macros;

pub mod deposit;
pub mod kind;
pub mod nation;
pub mod node;
pub mod profile;
pub mod territory;
pub mod town;

pub use deposit::OreDeposit;
pub use kind::{AnimalKind, ItemKind};
pub use nation::{Nation, NationId};
pub use node::{NodeRegistry, ResourceNode};
pub use profile::ResourceProfile;
pub use territory::{ChunkCoord, Territory, TerritoryId, TerritoryRaw};
pub use town::{Resident, Town, TownId};
