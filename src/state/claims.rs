//! Territory ownership state machine.
//!
//! Every operation runs all precondition checks before touching anything,
//! so a returned [`ClaimError`] guarantees no state was mutated.

use crate::error::ClaimError;
use crate::model::{TerritoryId, TownId};

use super::WorldState;

impl WorldState {
    /// Claim an unowned territory adjacent to the town's existing land.
    ///
    /// The adjacency requirement is waived for a town claiming its very
    /// first territory, which becomes its home.
    pub fn claim(&mut self, town_id: TownId, territory_id: TerritoryId) -> Result<(), ClaimError> {
        let town = self
            .towns
            .get(&town_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        let territory = self
            .territories
            .get(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        if territory.town.is_some() {
            return Err(ClaimError::AlreadyClaimed(territory_id));
        }
        let first_claim = town.territories.is_empty();
        if !first_claim
            && territory
                .neighbors
                .iter()
                .all(|n| !town.territories.contains(n))
        {
            return Err(ClaimError::NotConnected(territory_id));
        }
        let cost = territory.cost;
        if cost > town.claims_available() {
            return Err(ClaimError::OverBudget {
                cost,
                available: town.claims_available(),
            });
        }

        let town = self.towns.get_mut(&town_id).expect("checked above");
        town.territories.insert(territory_id);
        town.claims_used += cost;
        if first_claim {
            town.home = territory_id;
        }
        self.territories
            .get_mut(&territory_id)
            .expect("checked above")
            .town = Some(town_id);
        self.recompute_town_claims(town_id);
        Ok(())
    }

    /// Give up an owned territory. The home territory can never be
    /// unclaimed directly; non-annexed territories convert their cost into
    /// a claims penalty to discourage claim churn.
    pub fn unclaim(&mut self, town_id: TownId, territory_id: TerritoryId) -> Result<(), ClaimError> {
        let town = self
            .towns
            .get(&town_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        let territory = self
            .territories
            .get(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        if territory.town != Some(town_id) {
            return Err(ClaimError::NotOwner(territory_id));
        }
        if town.home == territory_id {
            return Err(ClaimError::HomeTerritory(territory_id));
        }

        let cost = territory.cost;
        let town = self.towns.get_mut(&town_id).expect("checked above");
        town.territories.remove(&territory_id);
        if !town.annexed.remove(&territory_id) {
            town.claims_used -= cost;
            town.claims_penalty += cost;
        }
        self.territories
            .get_mut(&territory_id)
            .expect("checked above")
            .town = None;
        self.recompute_town_claims(town_id);
        Ok(())
    }

    /// Administrative claim: bypasses connectivity and budget checks but
    /// still refuses already-owned territory.
    pub fn add_territory_forced(
        &mut self,
        town_id: TownId,
        territory_id: TerritoryId,
    ) -> Result<(), ClaimError> {
        let town = self
            .towns
            .get(&town_id)
            .ok_or(ClaimError::UnknownTown(town_id))?;
        let territory = self
            .territories
            .get(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        if territory.town.is_some() {
            return Err(ClaimError::AlreadyClaimed(territory_id));
        }
        let first_claim = town.territories.is_empty();
        let cost = territory.cost;

        let town = self.towns.get_mut(&town_id).expect("checked above");
        town.territories.insert(territory_id);
        town.claims_used += cost;
        if first_claim {
            town.home = territory_id;
        }
        self.territories
            .get_mut(&territory_id)
            .expect("checked above")
            .town = Some(town_id);
        self.recompute_town_claims(town_id);
        Ok(())
    }

    /// Occupy a territory. Any previous occupier is released first;
    /// capturing your own territory only clears the occupation. Costs no
    /// claim power.
    pub fn capture(&mut self, town_id: TownId, territory_id: TerritoryId) -> Result<(), ClaimError> {
        if !self.towns.contains_key(&town_id) {
            return Err(ClaimError::UnknownTown(town_id));
        }
        let territory = self
            .territories
            .get(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        let owner = territory.town;
        let previous = territory.occupier;

        if let Some(previous) = previous {
            if let Some(old_occupier) = self.towns.get_mut(&previous) {
                old_occupier.captured.remove(&territory_id);
            }
        }
        let territory = self.territories.get_mut(&territory_id).expect("checked above");
        if owner == Some(town_id) {
            territory.occupier = None;
        } else {
            territory.occupier = Some(town_id);
            self.towns
                .get_mut(&town_id)
                .expect("checked above")
                .captured
                .insert(territory_id);
        }
        Ok(())
    }

    /// Clear a territory's occupation. No-op if unoccupied.
    pub fn release(&mut self, territory_id: TerritoryId) -> Result<(), ClaimError> {
        let territory = self
            .territories
            .get_mut(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        let Some(occupier) = territory.occupier.take() else {
            return Ok(());
        };
        if let Some(town) = self.towns.get_mut(&occupier) {
            town.captured.remove(&territory_id);
        }
        Ok(())
    }

    /// Permanently transfer an occupied enemy territory to its occupier at
    /// zero claim cost. Annexing the old owner's last remaining (home)
    /// territory dissolves that town entirely.
    pub fn annex(&mut self, town_id: TownId, territory_id: TerritoryId) -> Result<(), ClaimError> {
        if !self.towns.contains_key(&town_id) {
            return Err(ClaimError::UnknownTown(town_id));
        }
        let territory = self
            .territories
            .get(&territory_id)
            .ok_or(ClaimError::UnknownTerritory(territory_id))?;
        if territory.occupier != Some(town_id) {
            return Err(ClaimError::NotOccupier(territory_id));
        }
        let old_owner = match territory.town {
            None => return Err(ClaimError::Unowned(territory_id)),
            Some(owner) if owner == town_id => {
                return Err(ClaimError::AlreadyOwner(territory_id));
            }
            Some(owner) => owner,
        };
        let cost = territory.cost;

        let old = self.towns.get(&old_owner).ok_or(ClaimError::UnknownTown(old_owner))?;
        let dissolves = old.territories.len() == 1 && old.home == territory_id;
        if dissolves {
            self.destroy_town(old_owner)?;
        } else {
            let old = self.towns.get_mut(&old_owner).expect("checked above");
            old.territories.remove(&territory_id);
            if !old.annexed.remove(&territory_id) {
                // The lost slot stays a liability instead of freeing budget.
                old.claims_used -= cost;
                old.claims_annexed += cost;
            }
            self.recompute_town_claims(old_owner);
        }

        let new = self.towns.get_mut(&town_id).expect("checked above");
        new.captured.remove(&territory_id);
        new.territories.insert(territory_id);
        new.annexed.insert(territory_id);
        let territory = self.territories.get_mut(&territory_id).expect("checked above");
        territory.town = Some(town_id);
        territory.occupier = None;
        self.recompute_town_claims(town_id);
        Ok(())
    }
}
