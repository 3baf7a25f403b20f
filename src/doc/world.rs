use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::{compile_partial, compile_world};
use crate::model::{
    AnimalKind, ChunkCoord, ItemKind, NodeRegistry, OreDeposit, ResourceNode, Territory,
    TerritoryId, TerritoryRaw,
};
use crate::state::WorldState;

use super::DocMeta;

pub const WORLD_DOC_TYPE: &str = "world";

/// The world document: resource node definitions plus raw territories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDoc {
    pub meta: DocMeta,
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeDoc>,
    #[serde(default)]
    pub territories: BTreeMap<u32, TerritoryDoc>,
}

/// Resource node definition as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDoc {
    pub priority: i32,
    #[serde(rename = "costConstant")]
    pub cost_constant: f64,
    #[serde(rename = "costScale")]
    pub cost_scale: f64,
    pub income: BTreeMap<ItemKind, f64>,
    pub ores: BTreeMap<ItemKind, OreDeposit>,
    pub crops: BTreeMap<ItemKind, f64>,
    pub animals: BTreeMap<AnimalKind, f64>,
    #[serde(rename = "neighborModifier")]
    pub neighbor_modifier: bool,
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl Default for NodeDoc {
    fn default() -> Self {
        Self {
            priority: 0,
            cost_constant: 0.0,
            cost_scale: 1.0,
            income: BTreeMap::new(),
            ores: BTreeMap::new(),
            crops: BTreeMap::new(),
            animals: BTreeMap::new(),
            neighbor_modifier: false,
            custom: BTreeMap::new(),
        }
    }
}

impl NodeDoc {
    pub fn into_node(self, name: &str) -> ResourceNode {
        ResourceNode {
            name: name.to_string(),
            priority: self.priority,
            cost_constant: self.cost_constant,
            cost_scale: self.cost_scale,
            income: self.income,
            ores: self.ores,
            crops: self.crops,
            animals: self.animals,
            has_neighbor_modifier: self.neighbor_modifier,
            custom_properties: self.custom,
        }
    }

    pub fn from_node(node: &ResourceNode) -> Self {
        Self {
            priority: node.priority,
            cost_constant: node.cost_constant,
            cost_scale: node.cost_scale,
            income: node.income.clone(),
            ores: node.ores.clone(),
            crops: node.crops.clone(),
            animals: node.animals.clone(),
            neighbor_modifier: node.has_neighbor_modifier,
            custom: node.custom_properties.clone(),
        }
    }
}

/// Territory record as persisted. Chunks are a flat `[x, z, x, z, ...]`
/// coordinate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryDoc {
    pub name: String,
    pub core: (i32, i32),
    #[serde(rename = "coreChunk")]
    pub core_chunk: (i32, i32),
    pub chunks: Vec<i32>,
    pub neighbors: Vec<u32>,
    #[serde(rename = "isEdge")]
    pub is_edge: bool,
    pub nodes: Vec<String>,
    pub color: i32,
}

impl Default for TerritoryDoc {
    fn default() -> Self {
        Self {
            name: String::new(),
            core: (0, 0),
            core_chunk: (0, 0),
            chunks: Vec::new(),
            neighbors: Vec::new(),
            is_edge: false,
            nodes: Vec::new(),
            color: 0,
        }
    }
}

impl TerritoryDoc {
    pub fn to_raw(&self, id: TerritoryId) -> Result<TerritoryRaw, EngineError> {
        if self.chunks.len() % 2 != 0 {
            return Err(EngineError::MalformedTerritory {
                territory: id,
                reason: format!("odd chunk coordinate list length {}", self.chunks.len()),
            });
        }
        let chunks: BTreeSet<ChunkCoord> = self
            .chunks
            .chunks_exact(2)
            .map(|pair| ChunkCoord::new(pair[0], pair[1]))
            .collect();
        Ok(TerritoryRaw {
            id,
            name: self.name.clone(),
            core: self.core,
            core_chunk: ChunkCoord::new(self.core_chunk.0, self.core_chunk.1),
            chunks,
            neighbors: self.neighbors.iter().map(|&n| TerritoryId(n)).collect(),
            borders_wilderness: self.is_edge,
            node_names: self.nodes.clone(),
            color: self.color,
        })
    }

    pub fn from_territory(territory: &Territory) -> Self {
        let mut chunks = Vec::with_capacity(territory.chunks.len() * 2);
        for chunk in &territory.chunks {
            chunks.push(chunk.x);
            chunks.push(chunk.z);
        }
        Self {
            name: territory.name.clone(),
            core: territory.core,
            core_chunk: (territory.core_chunk.x, territory.core_chunk.z),
            chunks,
            neighbors: territory.neighbors.iter().map(|id| id.0).collect(),
            is_edge: territory.borders_wilderness,
            nodes: territory.node_names.clone(),
            color: territory.color,
        }
    }
}

/// Parse and type-check a world document.
pub fn parse_world_doc(json: &str) -> Result<WorldDoc, EngineError> {
    let doc: WorldDoc = serde_json::from_str(json)?;
    if doc.meta.doc_type != WORLD_DOC_TYPE {
        return Err(EngineError::DocumentType {
            expected: WORLD_DOC_TYPE,
            found: doc.meta.doc_type,
        });
    }
    Ok(doc)
}

/// Build the node registry from a world document.
pub fn build_registry(doc: &WorldDoc) -> Result<NodeRegistry, EngineError> {
    let mut registry = NodeRegistry::new();
    for (name, node_doc) in &doc.nodes {
        registry.register(node_doc.clone().into_node(name))?;
    }
    Ok(registry)
}

/// Load a full world: registry populated, territory graph compiled.
///
/// Any configuration error (unknown node, malformed territory, chunk
/// overlap) aborts the whole load.
pub fn load_world(config: EngineConfig, json: &str) -> Result<WorldState, EngineError> {
    let doc = parse_world_doc(json)?;
    let registry = build_registry(&doc)?;

    let mut raws = Vec::with_capacity(doc.territories.len());
    for (id, territory_doc) in &doc.territories {
        raws.push(territory_doc.to_raw(TerritoryId(*id))?);
    }
    let compiled = compile_world(&config, &registry, raws)?;

    let mut state = WorldState::new(config);
    state.nodes = registry;
    state.set_territories(compiled)?;
    Ok(state)
}

/// Reload the given territory ids (plus their two-hop neighborhood) from a
/// re-parsed world document, leaving towns and nations untouched apart
/// from claim budgets that follow recompiled territory costs.
///
/// Ids absent from the document are skipped with a warning. Returns the
/// number of territories actually recompiled.
pub fn reload_territories(
    state: &mut WorldState,
    doc: &WorldDoc,
    ids: &[TerritoryId],
) -> Result<usize, EngineError> {
    let registry = build_registry(doc)?;

    let mut edited = Vec::with_capacity(ids.len());
    for id in ids {
        match doc.territories.get(&id.0) {
            Some(territory_doc) => edited.push(territory_doc.to_raw(*id)?),
            None => {
                tracing::warn!(territory = id.0, "reload skipping id absent from document");
            }
        }
    }

    let existing: BTreeMap<TerritoryId, Territory> = state
        .territories()
        .map(|t| (t.id, t.clone()))
        .collect();
    let compiled = compile_partial(&state.config, &registry, edited, &existing)?;
    let recompiled = compiled.len();

    let owners: BTreeSet<crate::model::TownId> =
        compiled.iter().filter_map(|t| t.town).collect();
    state.replace_territories(compiled)?;
    state.nodes = registry;

    // Costs may have moved; restore the claims_used invariant for owners.
    for town_id in owners {
        let Some(town) = state.town(town_id) else { continue };
        let used: i64 = town
            .territories
            .difference(&town.annexed)
            .filter_map(|id| state.territory(*id))
            .map(|t| t.cost)
            .sum();
        if let Some(town) = state.towns.get_mut(&town_id) {
            town.claims_used = used;
        }
        state.recompute_town_claims(town_id);
    }
    Ok(recompiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_meta_type_rejected() {
        let err = parse_world_doc(r#"{"meta": {"type": "towns"}}"#).unwrap_err();
        assert!(matches!(err, EngineError::DocumentType { expected: "world", .. }));
    }

    #[test]
    fn territory_doc_round_trips_through_raw() {
        let doc = TerritoryDoc {
            name: "Northmarch".to_string(),
            core: (160, -48),
            core_chunk: (10, -3),
            chunks: vec![10, -3, 11, -3, 10, -2],
            neighbors: vec![2, 7],
            is_edge: true,
            nodes: vec!["gold".to_string()],
            color: 0xff_00_00,
        };
        let raw = doc.to_raw(TerritoryId(1)).unwrap();
        assert_eq!(raw.chunks.len(), 3);
        assert!(raw.chunks.contains(&ChunkCoord::new(11, -3)));
        assert_eq!(raw.core_chunk, ChunkCoord::new(10, -3));
        assert!(raw.borders_wilderness);
        assert_eq!(raw.neighbors.len(), 2);
    }

    #[test]
    fn odd_chunk_list_is_malformed() {
        let doc = TerritoryDoc {
            chunks: vec![0, 0, 1],
            ..TerritoryDoc::default()
        };
        assert!(matches!(
            doc.to_raw(TerritoryId(1)),
            Err(EngineError::MalformedTerritory { .. })
        ));
    }

    #[test]
    fn node_doc_defaults_are_neutral() {
        let doc: NodeDoc = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.cost_scale, 1.0);
        assert_eq!(doc.cost_constant, 0.0);
        assert!(!doc.neighbor_modifier);
    }

    #[test]
    fn node_doc_keeps_custom_properties() {
        let doc: NodeDoc =
            serde_json::from_str(r#"{"priority": 3, "banner": "war"}"#).unwrap();
        assert_eq!(doc.priority, 3);
        assert_eq!(doc.custom["banner"], serde_json::json!("war"));
    }
}
