use std::collections::BTreeMap;

use serde_json::Value;

use super::deposit::OreDeposit;
use super::kind::{AnimalKind, ItemKind};

/// A territory's composed resource profile.
///
/// Produced by folding the global baseline through the territory's sorted
/// resource node list, then folding in neighbor contributions from every
/// adjacent territory whose own profile carries a neighbor modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceProfile {
    /// Flat claim cost accumulator (global base + node constants).
    pub cost_constant: f64,
    /// Per-chunk claim cost accumulator (global base × node scales).
    pub cost_scale: f64,
    pub income: BTreeMap<ItemKind, f64>,
    pub ores: BTreeMap<ItemKind, OreDeposit>,
    pub crops: BTreeMap<ItemKind, f64>,
    pub animals: BTreeMap<AnimalKind, f64>,
    pub has_neighbor_modifier: bool,
    pub custom_properties: BTreeMap<String, Value>,
}

impl ResourceProfile {
    /// Baseline profile every territory fold starts from.
    pub fn baseline(cost_constant: f64, cost_scale: f64) -> Self {
        Self {
            cost_constant,
            cost_scale,
            income: BTreeMap::new(),
            ores: BTreeMap::new(),
            crops: BTreeMap::new(),
            animals: BTreeMap::new(),
            has_neighbor_modifier: false,
            custom_properties: BTreeMap::new(),
        }
    }
}
