use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Nation, NationId, Resident, TerritoryId, Town, TownId};
use crate::state::WorldState;

use super::DocMeta;

pub const TOWNS_DOC_TYPE: &str = "towns";

/// The towns document: residents, towns, and nations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownsDoc {
    pub meta: DocMeta,
    #[serde(default)]
    pub residents: BTreeMap<String, ResidentDoc>,
    #[serde(default)]
    pub towns: BTreeMap<String, TownDoc>,
    #[serde(default)]
    pub nations: BTreeMap<String, NationDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentDoc {
    pub name: String,
    /// Absent means "grant the configured starting claim power".
    pub claims: Option<i64>,
    #[serde(rename = "claimsTime")]
    pub claims_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TownDoc {
    pub uuid: String,
    pub color: i32,
    pub leader: Option<String>,
    pub officers: Vec<String>,
    pub residents: Vec<String>,
    pub territories: Vec<u32>,
    pub captured: Vec<u32>,
    pub annexed: Vec<u32>,
    pub home: u32,
    pub allies: Vec<String>,
    pub enemies: Vec<String>,
    pub truce: Vec<String>,
    pub nation: Option<String>,
    #[serde(rename = "claimsBonus")]
    pub claims_bonus: i64,
    #[serde(rename = "claimsPenalty")]
    pub claims_penalty: i64,
    #[serde(rename = "claimsAnnexed")]
    pub claims_annexed: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NationDoc {
    pub uuid: String,
    pub capital: String,
    pub color: i32,
    pub towns: Vec<String>,
}

/// Per-entry skip counters from a towns-document load. Skips are
/// data-integrity warnings, never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub residents: usize,
    pub towns: usize,
    pub nations: usize,
    pub skipped_towns: usize,
    pub skipped_territories: usize,
    pub skipped_residents: usize,
    pub skipped_links: usize,
}

/// Parse and type-check a towns document.
pub fn parse_towns_doc(json: &str) -> Result<TownsDoc, EngineError> {
    let doc: TownsDoc = serde_json::from_str(json)?;
    if doc.meta.doc_type != TOWNS_DOC_TYPE {
        return Err(EngineError::DocumentType {
            expected: TOWNS_DOC_TYPE,
            found: doc.meta.doc_type,
        });
    }
    Ok(doc)
}

/// Load a towns document into the state. The world document must already
/// be loaded; entries referencing unknown territories, residents, or towns
/// are logged and skipped, never fatal.
pub fn load_towns(state: &mut WorldState, json: &str) -> Result<LoadReport, EngineError> {
    let doc = parse_towns_doc(json)?;
    let mut report = LoadReport::default();

    for (uuid, resident_doc) in &doc.residents {
        let claims = resident_doc
            .claims
            .unwrap_or(state.config.resident_claims_initial);
        let mut resident = Resident::new(uuid.clone(), resident_doc.name.clone(), claims);
        resident.claims_time = resident_doc.claims_time;
        state.residents.insert(uuid.clone(), resident);
        report.residents += 1;
    }

    // Pass 1: towns, territory links, residents.
    for (name, town_doc) in &doc.towns {
        let home = TerritoryId(town_doc.home);
        if state.territory(home).is_none() {
            tracing::warn!(town = %name, territory = home.0, "skipping town: home territory missing");
            report.skipped_towns += 1;
            continue;
        }
        let id = TownId(state.id_gen.next_id());
        let mut town = Town::new(id, name.clone(), town_doc.uuid.clone(), home);
        town.color = town_doc.color;
        town.claims_bonus = town_doc.claims_bonus;
        town.claims_penalty = town_doc.claims_penalty;
        town.claims_annexed = town_doc.claims_annexed;

        for uuid in &town_doc.residents {
            match state.residents.get_mut(uuid) {
                Some(resident) => {
                    resident.town = Some(id);
                    town.residents.insert(uuid.clone());
                }
                None => {
                    tracing::warn!(town = %name, resident = %uuid, "skipping unknown resident");
                    report.skipped_residents += 1;
                }
            }
        }
        for uuid in &town_doc.officers {
            if town.residents.contains(uuid) {
                town.officers.insert(uuid.clone());
            }
        }
        town.leader = town_doc
            .leader
            .as_ref()
            .filter(|uuid| town.residents.contains(*uuid))
            .cloned();

        for raw_id in &town_doc.territories {
            let territory_id = TerritoryId(*raw_id);
            match state.territory_mut(territory_id) {
                Some(territory) if territory.town.is_none() => {
                    territory.town = Some(id);
                    town.territories.insert(territory_id);
                }
                Some(_) => {
                    tracing::warn!(town = %name, territory = raw_id, "skipping doubly-owned territory");
                    report.skipped_territories += 1;
                }
                None => {
                    tracing::warn!(town = %name, territory = raw_id, "skipping unknown territory");
                    report.skipped_territories += 1;
                }
            }
        }
        for raw_id in &town_doc.annexed {
            let territory_id = TerritoryId(*raw_id);
            if town.territories.contains(&territory_id) {
                town.annexed.insert(territory_id);
            }
        }
        for raw_id in &town_doc.captured {
            let territory_id = TerritoryId(*raw_id);
            match state.territory_mut(territory_id) {
                Some(territory) if territory.occupier.is_none() => {
                    territory.occupier = Some(id);
                    town.captured.insert(territory_id);
                }
                Some(_) => {
                    tracing::warn!(town = %name, territory = raw_id, "skipping doubly-captured territory");
                    report.skipped_territories += 1;
                }
                None => {
                    tracing::warn!(town = %name, territory = raw_id, "skipping unknown captured territory");
                    report.skipped_territories += 1;
                }
            }
        }

        town.claims_used = town
            .territories
            .difference(&town.annexed)
            .filter_map(|tid| state.territory(*tid))
            .map(|t| t.cost)
            .sum();

        state.town_names.insert(name.clone(), id);
        state.towns.insert(id, town);
        state.recompute_town_claims(id);
        report.towns += 1;
    }

    // Pass 2: diplomacy links, now that every town has an id.
    for (name, town_doc) in &doc.towns {
        let Some(&id) = state.town_names.get(name) else {
            continue;
        };
        let mut resolve = |names: &[String], report: &mut LoadReport| -> Vec<TownId> {
            names
                .iter()
                .filter_map(|other| match state.town_names.get(other) {
                    Some(&other_id) => Some(other_id),
                    None => {
                        tracing::warn!(town = %name, other = %other, "skipping unknown diplomacy link");
                        report.skipped_links += 1;
                        None
                    }
                })
                .collect()
        };
        let allies = resolve(&town_doc.allies, &mut report);
        let enemies = resolve(&town_doc.enemies, &mut report);
        let truce = resolve(&town_doc.truce, &mut report);
        let town = state.towns.get_mut(&id).expect("inserted in pass 1");
        town.allies = allies.into_iter().collect();
        town.enemies = enemies.into_iter().collect();
        town.truce = truce.into_iter().collect();
    }

    for (name, nation_doc) in &doc.nations {
        let Some(&capital) = state.town_names.get(&nation_doc.capital) else {
            tracing::warn!(nation = %name, capital = %nation_doc.capital, "skipping nation: unknown capital");
            report.skipped_links += 1;
            continue;
        };
        let id = NationId(state.id_gen.next_id());
        let mut nation = Nation::new(id, name.clone(), nation_doc.uuid.clone(), capital);
        nation.color = nation_doc.color;
        state.towns.get_mut(&capital).expect("resolved above").nation = Some(id);
        for member in &nation_doc.towns {
            match state.town_names.get(member) {
                Some(&member_id) => {
                    nation.towns.insert(member_id);
                    state
                        .towns
                        .get_mut(&member_id)
                        .expect("resolved above")
                        .nation = Some(id);
                }
                None => {
                    tracing::warn!(nation = %name, town = %member, "skipping unknown member town");
                    report.skipped_links += 1;
                }
            }
        }
        state.nation_names.insert(name.clone(), id);
        state.nations.insert(id, nation);
        report.nations += 1;
    }

    Ok(report)
}
