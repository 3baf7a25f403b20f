pub mod claims;
pub mod economy;

use std::collections::{BTreeMap, HashMap};

use crate::config::EngineConfig;
use crate::error::{ClaimError, EngineError};
use crate::id::IdGenerator;
use crate::model::{
    ChunkCoord, Nation, NationId, NodeRegistry, Resident, Territory, TerritoryId, Town, TownId,
};

/// The whole engine state: arenas of territories, towns, nations, and
/// residents, keyed by id. Cross-references are ids looked up through the
/// owning arena, never direct references, so destroying an entity is a
/// sweep over dependents rather than pointer chasing.
///
/// Logically single-threaded: all mutation happens on the host's
/// simulation thread. Background saves work on [`crate::doc::WorldSnapshot`]
/// captures, never on this struct.
#[derive(Debug)]
pub struct WorldState {
    pub config: EngineConfig,
    pub nodes: NodeRegistry,
    pub(crate) territories: BTreeMap<TerritoryId, Territory>,
    pub(crate) chunk_grid: HashMap<ChunkCoord, TerritoryId>,
    pub(crate) towns: BTreeMap<TownId, Town>,
    pub(crate) town_names: HashMap<String, TownId>,
    pub(crate) nations: BTreeMap<NationId, Nation>,
    pub(crate) nation_names: HashMap<String, NationId>,
    pub(crate) residents: BTreeMap<String, Resident>,
    pub(crate) id_gen: IdGenerator,
}

impl WorldState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            nodes: NodeRegistry::new(),
            territories: BTreeMap::new(),
            chunk_grid: HashMap::new(),
            towns: BTreeMap::new(),
            town_names: HashMap::new(),
            nations: BTreeMap::new(),
            nation_names: HashMap::new(),
            residents: BTreeMap::new(),
            id_gen: IdGenerator::new(),
        }
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(&id)
    }

    /// Territory owning the given chunk, if any.
    pub fn territory_at(&self, chunk: ChunkCoord) -> Option<&Territory> {
        self.chunk_grid
            .get(&chunk)
            .and_then(|id| self.territories.get(id))
    }

    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn town(&self, id: TownId) -> Option<&Town> {
        self.towns.get(&id)
    }

    pub fn town_by_name(&self, name: &str) -> Option<&Town> {
        self.town_names.get(name).and_then(|id| self.towns.get(id))
    }

    pub fn towns(&self) -> impl Iterator<Item = &Town> {
        self.towns.values()
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.get(&id)
    }

    pub fn nation_by_name(&self, name: &str) -> Option<&Nation> {
        self.nation_names
            .get(name)
            .and_then(|id| self.nations.get(id))
    }

    pub fn nations(&self) -> impl Iterator<Item = &Nation> {
        self.nations.values()
    }

    pub fn resident(&self, uuid: &str) -> Option<&Resident> {
        self.residents.get(uuid)
    }

    pub fn residents(&self) -> impl Iterator<Item = &Resident> {
        self.residents.values()
    }

    /// Replace the whole territory table (fresh world load).
    ///
    /// Every chunk must belong to exactly one territory; overlap is a
    /// configuration error and leaves the previous state untouched.
    pub fn set_territories(
        &mut self,
        territories: BTreeMap<TerritoryId, Territory>,
    ) -> Result<(), EngineError> {
        let mut grid = HashMap::new();
        for territory in territories.values() {
            for &chunk in &territory.chunks {
                if let Some(first) = grid.insert(chunk, territory.id) {
                    return Err(EngineError::ChunkOverlap {
                        chunk,
                        first,
                        second: territory.id,
                    });
                }
            }
        }
        self.territories = territories;
        self.chunk_grid = grid;
        Ok(())
    }

    /// Swap recompiled territories into the table (partial rebuild).
    ///
    /// Grid entries for the replaced ids are removed and re-inserted as one
    /// step so no stale chunk lookup can observe a half-applied edit.
    /// Collisions against territories outside the replacement set abort
    /// before anything is mutated.
    pub fn replace_territories(
        &mut self,
        replacements: Vec<Territory>,
    ) -> Result<(), EngineError> {
        let replaced: std::collections::BTreeSet<TerritoryId> =
            replacements.iter().map(|t| t.id).collect();

        let mut incoming: HashMap<ChunkCoord, TerritoryId> = HashMap::new();
        for territory in &replacements {
            for &chunk in &territory.chunks {
                if let Some(first) = incoming.insert(chunk, territory.id) {
                    return Err(EngineError::ChunkOverlap {
                        chunk,
                        first,
                        second: territory.id,
                    });
                }
                if let Some(&owner) = self.chunk_grid.get(&chunk) {
                    if !replaced.contains(&owner) {
                        return Err(EngineError::ChunkOverlap {
                            chunk,
                            first: owner,
                            second: territory.id,
                        });
                    }
                }
            }
        }

        // Remove old grid entries, then insert new.
        for id in &replaced {
            if let Some(old) = self.territories.get(id) {
                for chunk in &old.chunks {
                    self.chunk_grid.remove(chunk);
                }
            }
        }
        for territory in replacements {
            for &chunk in &territory.chunks {
                self.chunk_grid.insert(chunk, territory.id);
            }
            self.territories.insert(territory.id, territory);
        }
        Ok(())
    }

    /// Register a resident if not already known.
    pub fn add_resident(&mut self, uuid: impl Into<String>, name: impl Into<String>) {
        let uuid = uuid.into();
        let claims = self.config.resident_claims_initial;
        self.residents
            .entry(uuid.clone())
            .or_insert_with(|| Resident::new(uuid, name.into(), claims));
    }

    /// Found a town on an unclaimed home territory.
    ///
    /// The home claim bypasses connectivity (a town's first territory) but
    /// still checks the founder's starting claim budget.
    pub fn create_town(
        &mut self,
        name: &str,
        founder_uuid: &str,
        home: TerritoryId,
    ) -> Result<TownId, ClaimError> {
        if self.town_names.contains_key(name) {
            return Err(ClaimError::TownNameTaken(name.to_string()));
        }
        let founder_claims = self
            .residents
            .get(founder_uuid)
            .ok_or_else(|| ClaimError::UnknownResident(founder_uuid.to_string()))?
            .claims;
        let territory = self
            .territories
            .get(&home)
            .ok_or(ClaimError::UnknownTerritory(home))?;
        if territory.town.is_some() {
            return Err(ClaimError::AlreadyClaimed(home));
        }
        let claims_max = (self.config.town_claims_base + founder_claims)
            .clamp(0, self.config.town_claims_ceiling);
        if territory.cost > claims_max {
            return Err(ClaimError::OverBudget {
                cost: territory.cost,
                available: claims_max,
            });
        }

        let id = TownId(self.id_gen.next_id());
        let mut town = Town::new(id, name, format!("town-{}", id.0), home);
        town.leader = Some(founder_uuid.to_string());
        town.officers.insert(founder_uuid.to_string());
        town.residents.insert(founder_uuid.to_string());
        town.territories.insert(home);
        town.claims_used = territory.cost;
        self.towns.insert(id, town);
        self.town_names.insert(name.to_string(), id);
        self.territories.get_mut(&home).expect("checked above").town = Some(id);
        if let Some(resident) = self.residents.get_mut(founder_uuid) {
            resident.town = Some(id);
        }
        self.recompute_town_claims(id);
        Ok(id)
    }

    /// Destroy a town: null every territory back-reference it holds,
    /// release its occupations, detach its residents, and drop it from its
    /// nation (dissolving the nation if it was the last member).
    pub fn destroy_town(&mut self, id: TownId) -> Result<(), ClaimError> {
        let town = self.towns.remove(&id).ok_or(ClaimError::UnknownTown(id))?;
        self.town_names.remove(&town.name);

        for territory_id in &town.territories {
            if let Some(territory) = self.territories.get_mut(territory_id) {
                territory.town = None;
            }
        }
        for territory_id in &town.captured {
            if let Some(territory) = self.territories.get_mut(territory_id) {
                if territory.occupier == Some(id) {
                    territory.occupier = None;
                }
            }
        }
        for uuid in &town.residents {
            if let Some(resident) = self.residents.get_mut(uuid) {
                resident.town = None;
            }
        }
        for other in self.towns.values_mut() {
            other.allies.remove(&id);
            other.enemies.remove(&id);
            other.truce.remove(&id);
        }
        if let Some(nation_id) = town.nation {
            let dissolve = if let Some(nation) = self.nations.get_mut(&nation_id) {
                nation.towns.remove(&id);
                if nation.towns.is_empty() {
                    true
                } else {
                    if nation.capital == id {
                        nation.capital = *nation.towns.iter().next().expect("non-empty");
                    }
                    false
                }
            } else {
                false
            };
            if dissolve {
                if let Some(nation) = self.nations.remove(&nation_id) {
                    self.nation_names.remove(&nation.name);
                }
            }
        }
        Ok(())
    }

    /// Add a resident to an existing town.
    pub fn add_town_resident(&mut self, town_id: TownId, uuid: &str) -> Result<(), ClaimError> {
        if !self.residents.contains_key(uuid) {
            return Err(ClaimError::UnknownResident(uuid.to_string()));
        }
        let town = self
            .towns
            .get_mut(&town_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        town.residents.insert(uuid.to_string());
        if let Some(resident) = self.residents.get_mut(uuid) {
            resident.town = Some(town_id);
        }
        self.recompute_town_claims(town_id);
        Ok(())
    }

    /// Remove a resident from a town. Officer status of *other* residents
    /// is untouched; a departing leader leaves the seat empty.
    pub fn remove_town_resident(&mut self, town_id: TownId, uuid: &str) -> Result<(), ClaimError> {
        let town = self
            .towns
            .get_mut(&town_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        if !town.residents.remove(uuid) {
            return Err(ClaimError::UnknownResident(uuid.to_string()));
        }
        town.officers.remove(uuid);
        if town.leader.as_deref() == Some(uuid) {
            town.leader = None;
        }
        if let Some(resident) = self.residents.get_mut(uuid) {
            if resident.town == Some(town_id) {
                resident.town = None;
            }
        }
        self.recompute_town_claims(town_id);
        Ok(())
    }

    /// Found a nation with the given town as capital.
    pub fn create_nation(&mut self, name: &str, capital: TownId) -> Result<NationId, ClaimError> {
        if self.nation_names.contains_key(name) {
            return Err(ClaimError::TownNameTaken(name.to_string()));
        }
        if !self.towns.contains_key(&capital) {
            return Err(ClaimError::UnknownTown(capital));
        }
        let id = NationId(self.id_gen.next_id());
        let nation = Nation::new(id, name, format!("nation-{}", id.0), capital);
        self.nations.insert(id, nation);
        self.nation_names.insert(name.to_string(), id);
        self.towns.get_mut(&capital).expect("checked above").nation = Some(id);
        Ok(id)
    }

    /// Attach a town to a nation.
    pub fn add_nation_town(&mut self, nation_id: NationId, town_id: TownId) -> Result<(), ClaimError> {
        if !self.towns.contains_key(&town_id) {
            return Err(ClaimError::UnknownTown(town_id));
        }
        let nation = self
            .nations
            .get_mut(&nation_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        nation.towns.insert(town_id);
        self.towns.get_mut(&town_id).expect("checked above").nation = Some(nation_id);
        Ok(())
    }

    pub(crate) fn territory_mut(&mut self, id: TerritoryId) -> Option<&mut Territory> {
        self.territories.get_mut(&id)
    }
}
