#![allow(dead_code)]

use territory_engine::EngineConfig;

/// World document: three territories in a row, two resource nodes.
///
/// With the default config the compiled costs are 15 (gold_vein adds a
/// constant of 4), 11, and 11.
pub fn sample_world_json() -> String {
    r#"{
        "meta": {"type": "world"},
        "nodes": {
            "farmland": {
                "income": {"wheat": 2.0},
                "crops": {"wheat": 0.8},
                "animals": {"cow": 0.5}
            },
            "gold_vein": {
                "priority": 5,
                "costConstant": 4.0,
                "ores": {"gold_ore": [0.5, 1, 3, -32, 64]}
            }
        },
        "territories": {
            "1": {
                "name": "Northmarch",
                "core": [0, 0],
                "coreChunk": [0, 0],
                "chunks": [0, 0, 1, 0, 0, 1, 1, 1],
                "neighbors": [2],
                "isEdge": true,
                "nodes": ["gold_vein"],
                "color": 1
            },
            "2": {
                "name": "Greenfields",
                "core": [32, 0],
                "coreChunk": [2, 0],
                "chunks": [2, 0, 3, 0, 2, 1, 3, 1],
                "neighbors": [1, 3],
                "nodes": ["farmland"],
                "color": 2
            },
            "3": {
                "name": "Eastwatch",
                "core": [64, 0],
                "coreChunk": [4, 0],
                "chunks": [4, 0, 5, 0, 4, 1, 5, 1],
                "neighbors": [2],
                "isEdge": true,
                "color": 3
            }
        }
    }"#
    .to_string()
}

/// Towns document matching [`sample_world_json`]: one town holding
/// territories 1 and 2, two residents, one nation.
pub fn sample_towns_json() -> String {
    r#"{
        "meta": {"type": "towns"},
        "residents": {
            "uuid-alice": {"name": "Alice", "claims": 5},
            "uuid-bob": {"name": "Bob", "claims": 5}
        },
        "towns": {
            "Ironhold": {
                "uuid": "uuid-ironhold",
                "color": 7,
                "leader": "uuid-alice",
                "officers": ["uuid-alice"],
                "residents": ["uuid-alice", "uuid-bob"],
                "territories": [1, 2],
                "home": 1
            }
        },
        "nations": {
            "Northern Pact": {
                "uuid": "uuid-pact",
                "capital": "Ironhold",
                "towns": ["Ironhold"]
            }
        }
    }"#
    .to_string()
}

/// Config where every 4-chunk territory costs 6 and towns start with a
/// budget of exactly 20 regardless of residents.
pub fn tight_budget_config() -> EngineConfig {
    EngineConfig {
        territory_cost_base: 5.0,
        territory_cost_scale: 0.25,
        town_claims_base: 20,
        resident_claims_initial: 0,
        ..EngineConfig::default()
    }
}
