use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::EngineError;

use super::deposit::OreDeposit;
use super::kind::{AnimalKind, ItemKind};
use super::profile::ResourceProfile;

/// A named, reusable modifier bundle attachable to territories.
///
/// Immutable once registered. Lower `priority` applies first, so when two
/// nodes on the same territory set the same map key, the higher-priority
/// node (applied later) wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub name: String,
    pub priority: i32,
    pub cost_constant: f64,
    pub cost_scale: f64,
    pub income: BTreeMap<ItemKind, f64>,
    pub ores: BTreeMap<ItemKind, OreDeposit>,
    pub crops: BTreeMap<ItemKind, f64>,
    pub animals: BTreeMap<AnimalKind, f64>,
    pub has_neighbor_modifier: bool,
    pub custom_properties: BTreeMap<String, Value>,
}

impl ResourceNode {
    /// Minimal node carrying only a name; everything else neutral.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            cost_constant: 0.0,
            cost_scale: 1.0,
            income: BTreeMap::new(),
            ores: BTreeMap::new(),
            crops: BTreeMap::new(),
            animals: BTreeMap::new(),
            has_neighbor_modifier: false,
            custom_properties: BTreeMap::new(),
        }
    }

    /// Pure fold of this node over a profile: constants summed, scales
    /// multiplied, maps merged with this node's entries overwriting.
    pub fn apply(&self, profile: &ResourceProfile) -> ResourceProfile {
        let mut out = profile.clone();
        out.cost_constant += self.cost_constant;
        out.cost_scale *= self.cost_scale;
        out.income
            .extend(self.income.iter().map(|(k, v)| (k.clone(), *v)));
        out.ores
            .extend(self.ores.iter().map(|(k, v)| (k.clone(), *v)));
        out.crops
            .extend(self.crops.iter().map(|(k, v)| (k.clone(), *v)));
        out.animals
            .extend(self.animals.iter().map(|(k, v)| (k.clone(), *v)));
        out.has_neighbor_modifier |= self.has_neighbor_modifier;
        out.custom_properties.extend(
            self.custom_properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }

    /// Pure fold of this node's contribution onto a *neighbor's* profile.
    ///
    /// Rates are additive and cost accumulators are untouched: claim cost
    /// is defined over a territory's own node list only. Ore deposits are
    /// only inserted where the neighbor has no deposit of that kind.
    pub fn apply_neighbor_modifiers(&self, profile: &ResourceProfile) -> ResourceProfile {
        let mut out = profile.clone();
        for (kind, rate) in &self.income {
            *out.income.entry(kind.clone()).or_insert(0.0) += rate;
        }
        for (kind, rate) in &self.crops {
            *out.crops.entry(kind.clone()).or_insert(0.0) += rate;
        }
        for (kind, rate) in &self.animals {
            *out.animals.entry(kind.clone()).or_insert(0.0) += rate;
        }
        for (kind, deposit) in &self.ores {
            out.ores.entry(kind.clone()).or_insert(*deposit);
        }
        out
    }
}

/// Name → definition dictionary of resource nodes.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<String, ResourceNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Duplicate names are a configuration error.
    pub fn register(&mut self, node: ResourceNode) -> Result<(), EngineError> {
        if self.nodes.contains_key(&node.name) {
            return Err(EngineError::DuplicateResourceNode(node.name));
        }
        self.nodes.insert(node.name.clone(), node);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResourceNode> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }
}
