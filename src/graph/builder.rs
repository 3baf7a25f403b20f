use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{
    NodeRegistry, ResourceNode, ResourceProfile, Territory, TerritoryId, TerritoryRaw,
};

use super::cost::territory_cost;

/// Compile every territory of a world from raw records.
///
/// Fail-fast: any raw referencing an unknown resource node aborts the whole
/// batch with a configuration error and nothing is produced.
pub fn compile_world(
    config: &EngineConfig,
    registry: &NodeRegistry,
    raws: Vec<TerritoryRaw>,
) -> Result<BTreeMap<TerritoryId, Territory>, EngineError> {
    let mut raw_map = BTreeMap::new();
    for raw in raws {
        let id = raw.id;
        if raw_map.insert(id, raw).is_some() {
            return Err(EngineError::MalformedTerritory {
                territory: id,
                reason: "duplicate territory id".to_string(),
            });
        }
    }
    let rebuild: BTreeSet<TerritoryId> = raw_map.keys().copied().collect();
    let compiled = compile(config, registry, &raw_map, &rebuild)?;
    Ok(compiled.into_iter().map(|t| (t.id, t)).collect())
}

/// Recompile an edited subset of territories against the existing world.
///
/// Modifier effects travel one hop, so the working set is the edited ids
/// plus two hops of neighbors: the outer hop is read-only context whose own
/// profiles feed the middle hop, and only `edited ∪ direct-neighbors` are
/// actually recompiled and returned. Ownership links of recompiled
/// territories are carried over from the existing records.
pub fn compile_partial(
    config: &EngineConfig,
    registry: &NodeRegistry,
    edited: Vec<TerritoryRaw>,
    existing: &BTreeMap<TerritoryId, Territory>,
) -> Result<Vec<Territory>, EngineError> {
    let mut raw_map: BTreeMap<TerritoryId, TerritoryRaw> =
        edited.into_iter().map(|r| (r.id, r)).collect();
    let edited_ids: BTreeSet<TerritoryId> = raw_map.keys().copied().collect();

    // Two expansion rounds: edited → direct neighbors → neighbors' neighbors.
    let mut rebuild = edited_ids.clone();
    for round in 0..2 {
        let frontier: Vec<TerritoryId> = raw_map
            .values()
            .flat_map(|raw| raw.neighbors.iter().copied())
            .filter(|id| !raw_map.contains_key(id))
            .collect();
        for id in frontier {
            match existing.get(&id) {
                Some(territory) => {
                    raw_map.insert(id, territory.to_raw());
                    if round == 0 {
                        rebuild.insert(id);
                    }
                }
                None => {
                    tracing::warn!(territory = id.0, "partial rebuild references missing territory");
                }
            }
        }
    }

    let mut compiled = compile(config, registry, &raw_map, &rebuild)?;
    for territory in &mut compiled {
        if let Some(old) = existing.get(&territory.id) {
            territory.town = old.town;
            territory.occupier = old.occupier;
        }
    }
    Ok(compiled)
}

/// Shared compilation core: own profiles for the whole working set, final
/// profiles and compiled records for the `rebuild` subset only.
fn compile(
    config: &EngineConfig,
    registry: &NodeRegistry,
    raws: &BTreeMap<TerritoryId, TerritoryRaw>,
    rebuild: &BTreeSet<TerritoryId>,
) -> Result<Vec<Territory>, EngineError> {
    // 1. Resolve and priority-sort every territory's node list (fail-fast).
    let mut sorted_nodes: BTreeMap<TerritoryId, Vec<&ResourceNode>> = BTreeMap::new();
    for (id, raw) in raws {
        if !raw.chunks.contains(&raw.core_chunk) {
            return Err(EngineError::MalformedTerritory {
                territory: *id,
                reason: format!("core chunk {} outside chunk set", raw.core_chunk),
            });
        }
        let mut nodes = Vec::with_capacity(raw.node_names.len());
        for name in &raw.node_names {
            let node = registry
                .get(name)
                .ok_or_else(|| EngineError::UnknownResourceNode {
                    territory: *id,
                    name: name.clone(),
                })?;
            nodes.push(node);
        }
        nodes.sort_by_key(|n| n.priority);
        sorted_nodes.insert(*id, nodes);
    }

    // 2. Scratch own profiles: baseline folded through the sorted nodes.
    let baseline =
        ResourceProfile::baseline(config.territory_cost_base, config.territory_cost_scale);
    let mut own: BTreeMap<TerritoryId, ResourceProfile> = BTreeMap::new();
    for id in raws.keys() {
        let profile = sorted_nodes[id]
            .iter()
            .fold(baseline.clone(), |acc, node| node.apply(&acc));
        own.insert(*id, profile);
    }

    // 3. Final profiles for the rebuild set: own profile plus one-hop
    //    contributions from every modifier-bearing neighbor.
    let mut finals: BTreeMap<TerritoryId, ResourceProfile> = rebuild
        .iter()
        .map(|id| (*id, own[id].clone()))
        .collect();
    for (id, raw) in raws {
        if !own[id].has_neighbor_modifier {
            continue;
        }
        let modifier_nodes: Vec<&&ResourceNode> = sorted_nodes[id]
            .iter()
            .filter(|n| n.has_neighbor_modifier)
            .collect();
        for neighbor in &raw.neighbors {
            if neighbor == id {
                continue;
            }
            if let Some(profile) = finals.get_mut(neighbor) {
                for node in &modifier_nodes {
                    *profile = node.apply_neighbor_modifiers(profile);
                }
            }
        }
    }

    // 4. Compile territory records for the rebuild set.
    let mut compiled = Vec::with_capacity(rebuild.len());
    for id in rebuild {
        let raw = &raws[id];
        let profile = finals.remove(id).unwrap_or_else(|| own[id].clone());
        let node_names = sorted_nodes[id].iter().map(|n| n.name.clone()).collect();
        compiled.push(Territory {
            id: *id,
            name: raw.name.clone(),
            core: raw.core,
            core_chunk: raw.core_chunk,
            chunks: raw.chunks.clone(),
            neighbors: raw.neighbors.clone(),
            borders_wilderness: raw.borders_wilderness,
            node_names,
            color: raw.color,
            cost: territory_cost(raw.chunks.len(), profile.cost_constant, profile.cost_scale),
            income: profile.income,
            ores: profile.ores,
            crops: profile.crops,
            animals: profile.animals,
            custom_properties: profile.custom_properties,
            town: None,
            occupier: None,
        });
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChunkCoord, ItemKind};

    fn raw(id: u32, chunks: usize, neighbors: &[u32], nodes: &[&str]) -> TerritoryRaw {
        let chunk_set: BTreeSet<ChunkCoord> = (0..chunks as i32)
            .map(|i| ChunkCoord::new(id as i32 * 1000 + i, 0))
            .collect();
        TerritoryRaw {
            id: TerritoryId(id),
            name: format!("territory-{id}"),
            core: (id as i32 * 16000, 0),
            core_chunk: ChunkCoord::new(id as i32 * 1000, 0),
            chunks: chunk_set,
            neighbors: neighbors.iter().map(|&n| TerritoryId(n)).collect(),
            borders_wilderness: false,
            node_names: nodes.iter().map(|s| s.to_string()).collect(),
            color: 0,
        }
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        let mut gold = ResourceNode::named("gold");
        gold.priority = 10;
        gold.cost_constant = 5.0;
        gold.cost_scale = 1.2;
        gold.income.insert(ItemKind::GoldIngot, 1.0);
        registry.register(gold).unwrap();

        let mut fortress = ResourceNode::named("fortress");
        fortress.priority = 0;
        fortress.has_neighbor_modifier = true;
        fortress.income.insert(ItemKind::Stone, 2.0);
        registry.register(fortress).unwrap();
        registry
    }

    fn config() -> EngineConfig {
        EngineConfig {
            territory_cost_base: 10.0,
            territory_cost_scale: 1.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn unknown_node_aborts_whole_batch() {
        let raws = vec![raw(1, 4, &[], &["gold"]), raw(2, 4, &[], &["mithril"])];
        let err = compile_world(&config(), &registry(), raws).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownResourceNode { territory: TerritoryId(2), name } if name == "mithril"
        ));
    }

    #[test]
    fn core_chunk_outside_chunks_is_error() {
        let mut bad = raw(1, 4, &[], &[]);
        bad.core_chunk = ChunkCoord::new(-1, -1);
        let err = compile_world(&config(), &registry(), vec![bad]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedTerritory { .. }));
    }

    #[test]
    fn scenario_fortress_neighbor_feeds_gold_territory() {
        // A carries the modifier, B gets its contribution; B's cost comes
        // from gold only: round(10 + 5 + 1.0 * 1.2 * 10) = 27.
        let raws = vec![raw(1, 10, &[2], &["fortress"]), raw(2, 10, &[1], &["gold"])];
        let world = compile_world(&config(), &registry(), raws).unwrap();

        let b = &world[&TerritoryId(2)];
        assert_eq!(b.income[&ItemKind::Stone], 2.0, "neighbor contribution");
        assert_eq!(b.income[&ItemKind::GoldIngot], 1.0);
        assert_eq!(b.cost, 27);

        let a = &world[&TerritoryId(1)];
        assert!(a.income.get(&ItemKind::GoldIngot).is_none());
        assert_eq!(a.cost, 20); // round(10 + 1.0 * 10)
    }

    #[test]
    fn node_names_sorted_by_priority() {
        let raws = vec![raw(1, 4, &[], &["gold", "fortress"])];
        let world = compile_world(&config(), &registry(), raws).unwrap();
        assert_eq!(world[&TerritoryId(1)].node_names, vec!["fortress", "gold"]);
    }

    #[test]
    fn modifier_does_not_feed_itself() {
        // Territory 1 lists itself as a neighbor. Its stone income must
        // come from its own node fold exactly once; a self-applied
        // neighbor fold would add another 2.0 on top.
        let raws = vec![raw(1, 4, &[1, 2], &["fortress"]), raw(2, 4, &[1], &[])];
        let world = compile_world(&config(), &registry(), raws).unwrap();
        assert_eq!(world[&TerritoryId(1)].income[&ItemKind::Stone], 2.0);
        assert_eq!(world[&TerritoryId(2)].income[&ItemKind::Stone], 2.0);
    }

    #[test]
    fn partial_rebuild_matches_full_rebuild() {
        // Chain 1 - 2 - 3 - 4: editing 1 must see 3's modifier through 2.
        let chain = || {
            vec![
                raw(1, 4, &[2], &["gold"]),
                raw(2, 4, &[1, 3], &[]),
                raw(3, 4, &[2, 4], &["fortress"]),
                raw(4, 4, &[3], &[]),
            ]
        };
        let full = compile_world(&config(), &registry(), chain()).unwrap();

        let partial =
            compile_partial(&config(), &registry(), vec![chain().remove(0)], &full).unwrap();
        // Rebuild set is edited ∪ direct neighbors = {1, 2}.
        let rebuilt: BTreeSet<TerritoryId> = partial.iter().map(|t| t.id).collect();
        assert_eq!(
            rebuilt,
            [TerritoryId(1), TerritoryId(2)].into_iter().collect()
        );
        for territory in partial {
            assert_eq!(&territory, &full[&territory.id], "rebuild consistency");
        }
    }

    #[test]
    fn partial_rebuild_preserves_ownership_links() {
        use crate::model::TownId;
        let raws = vec![raw(1, 4, &[2], &["gold"]), raw(2, 4, &[1], &[])];
        let mut full = compile_world(&config(), &registry(), raws).unwrap();
        full.get_mut(&TerritoryId(1)).unwrap().town = Some(TownId(9));

        let edited = raw(1, 4, &[2], &[]);
        let partial = compile_partial(&config(), &registry(), vec![edited], &full).unwrap();
        let rebuilt_1 = partial.iter().find(|t| t.id == TerritoryId(1)).unwrap();
        assert_eq!(rebuilt_1.town, Some(TownId(9)));
        assert!(rebuilt_1.node_names.is_empty());
    }
}
