//! Shared builders for unit and integration tests.

use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::graph::compile_world;
use crate::model::{ChunkCoord, NodeRegistry, Territory, TerritoryId, TerritoryRaw};
use crate::state::WorldState;

/// Raw territory with 4 chunks at a distinct spot per id.
pub fn test_raw(id: u32, neighbors: &[u32]) -> TerritoryRaw {
    let chunks: BTreeSet<ChunkCoord> = (0..4)
        .map(|i| ChunkCoord::new(id as i32 * 100 + i, 0))
        .collect();
    TerritoryRaw {
        id: TerritoryId(id),
        name: format!("territory-{id}"),
        core: (id as i32 * 1600, 0),
        core_chunk: ChunkCoord::new(id as i32 * 100, 0),
        chunks,
        neighbors: neighbors.iter().map(|&n| TerritoryId(n)).collect(),
        borders_wilderness: false,
        node_names: Vec::new(),
        color: 0,
    }
}

/// A line graph 1 - 2 - ... - n of raw territories.
pub fn line_raws(n: u32) -> Vec<TerritoryRaw> {
    (1..=n)
        .map(|id| {
            let mut neighbors = Vec::new();
            if id > 1 {
                neighbors.push(id - 1);
            }
            if id < n {
                neighbors.push(id + 1);
            }
            test_raw(id, &neighbors)
        })
        .collect()
}

/// World state holding a compiled line of `n` node-less territories.
/// With default config each territory costs round(10 + 0.25 * 4) = 11.
pub fn state_with_line(n: u32) -> WorldState {
    state_with_line_config(n, EngineConfig::default())
}

pub fn state_with_line_config(n: u32, config: EngineConfig) -> WorldState {
    let registry = NodeRegistry::new();
    let compiled = compile_world(&config, &registry, line_raws(n)).expect("test world compiles");
    let mut state = WorldState::new(config);
    state.set_territories(compiled).expect("no chunk overlap");
    state
}

/// Two compiled territories (ids 1 and 2) without a surrounding state.
pub fn compiled_pair() -> (Territory, Territory) {
    let config = EngineConfig::default();
    let mut compiled = compile_world(&config, &NodeRegistry::new(), line_raws(2))
        .expect("test world compiles");
    let a = compiled.remove(&TerritoryId(1)).unwrap();
    let b = compiled.remove(&TerritoryId(2)).unwrap();
    (a, b)
}
