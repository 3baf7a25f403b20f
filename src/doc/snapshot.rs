use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::EngineError;
use crate::state::WorldState;

use super::towns::{NationDoc, ResidentDoc, TownDoc, TownsDoc, TOWNS_DOC_TYPE};
use super::world::{NodeDoc, TerritoryDoc, WorldDoc, WORLD_DOC_TYPE};
use super::DocMeta;

/// Immutable serialized capture of the whole engine state.
///
/// Captured on the simulation thread, then safe to hand to a background
/// worker for writing: it owns every byte and holds no reference back into
/// live `WorldState` objects.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub world: WorldDoc,
    pub towns: TownsDoc,
}

impl WorldSnapshot {
    pub fn capture(state: &WorldState) -> Self {
        let nodes: BTreeMap<String, NodeDoc> = state
            .nodes
            .iter()
            .map(|node| (node.name.clone(), NodeDoc::from_node(node)))
            .collect();
        let territories: BTreeMap<u32, TerritoryDoc> = state
            .territories()
            .map(|t| (t.id.0, TerritoryDoc::from_territory(t)))
            .collect();

        let residents: BTreeMap<String, ResidentDoc> = state
            .residents()
            .map(|r| {
                (
                    r.uuid.clone(),
                    ResidentDoc {
                        name: r.name.clone(),
                        claims: Some(r.claims),
                        claims_time: r.claims_time,
                    },
                )
            })
            .collect();

        let towns: BTreeMap<String, TownDoc> = state
            .towns()
            .map(|town| {
                let town_name = |id| {
                    state
                        .town(id)
                        .map(|t| t.name.clone())
                        .unwrap_or_default()
                };
                (
                    town.name.clone(),
                    TownDoc {
                        uuid: town.uuid.clone(),
                        color: town.color,
                        leader: town.leader.clone(),
                        officers: town.officers.iter().cloned().collect(),
                        residents: town.residents.iter().cloned().collect(),
                        territories: town.territories.iter().map(|id| id.0).collect(),
                        captured: town.captured.iter().map(|id| id.0).collect(),
                        annexed: town.annexed.iter().map(|id| id.0).collect(),
                        home: town.home.0,
                        allies: town.allies.iter().map(|&id| town_name(id)).collect(),
                        enemies: town.enemies.iter().map(|&id| town_name(id)).collect(),
                        truce: town.truce.iter().map(|&id| town_name(id)).collect(),
                        nation: town
                            .nation
                            .and_then(|id| state.nation(id))
                            .map(|n| n.name.clone()),
                        claims_bonus: town.claims_bonus,
                        claims_penalty: town.claims_penalty,
                        claims_annexed: town.claims_annexed,
                    },
                )
            })
            .collect();

        let nations: BTreeMap<String, NationDoc> = state
            .nations()
            .map(|nation| {
                (
                    nation.name.clone(),
                    NationDoc {
                        uuid: nation.uuid.clone(),
                        capital: state
                            .town(nation.capital)
                            .map(|t| t.name.clone())
                            .unwrap_or_default(),
                        color: nation.color,
                        towns: nation
                            .towns
                            .iter()
                            .filter_map(|id| state.town(*id))
                            .map(|t| t.name.clone())
                            .collect(),
                    },
                )
            })
            .collect();

        Self {
            world: WorldDoc {
                meta: DocMeta::of(WORLD_DOC_TYPE),
                nodes,
                territories,
            },
            towns: TownsDoc {
                meta: DocMeta::of(TOWNS_DOC_TYPE),
                residents,
                towns,
                nations,
            },
        }
    }

    pub fn world_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(&self.world)?)
    }

    pub fn towns_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(&self.towns)?)
    }

    /// Write both documents. Runs fine on a background thread.
    pub fn write(&self, world_path: &Path, towns_path: &Path) -> Result<(), EngineError> {
        write_doc(world_path, &self.world)?;
        write_doc(towns_path, &self.towns)?;
        Ok(())
    }
}

fn write_doc<T: serde::Serialize>(path: &Path, doc: &T) -> Result<(), EngineError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TerritoryId;
    use crate::testutil::state_with_line;

    fn populated_state() -> WorldState {
        let mut state = state_with_line(3);
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        state.claim(a, TerritoryId(2)).unwrap();
        state.create_nation("Northern Pact", a).unwrap();
        state
    }

    #[test]
    fn capture_is_self_contained() {
        let state = populated_state();
        let snapshot = WorldSnapshot::capture(&state);
        drop(state);
        // Usable after the live state is gone.
        assert_eq!(snapshot.world.territories.len(), 3);
        assert_eq!(snapshot.towns.towns["Ironhold"].territories.len(), 2);
        assert_eq!(snapshot.towns.nations["Northern Pact"].capital, "Ironhold");
    }

    #[test]
    fn snapshot_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WorldSnapshot>();
    }

    #[test]
    fn written_files_parse_back() {
        use crate::doc::world::parse_world_doc;
        use crate::doc::towns::parse_towns_doc;

        let state = populated_state();
        let snapshot = WorldSnapshot::capture(&state);
        let dir = tempfile::tempdir().unwrap();
        let world_path = dir.path().join("world.json");
        let towns_path = dir.path().join("towns.json");
        snapshot.write(&world_path, &towns_path).unwrap();

        let world = parse_world_doc(&std::fs::read_to_string(&world_path).unwrap()).unwrap();
        assert_eq!(world.territories.len(), 3);
        let towns = parse_towns_doc(&std::fs::read_to_string(&towns_path).unwrap()).unwrap();
        assert_eq!(towns.towns.len(), 1);
    }
}
