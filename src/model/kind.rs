use serde::{Deserialize, Serialize};

use super::macros::string_enum_open;

/// Item kind used in income, ore, and crop tables.
///
/// Open enum: unknown strings (modded content) become `Custom`. The empty
/// string is a configuration error, rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ItemKind {
    Wheat,
    Carrot,
    Potato,
    SugarCane,
    Pumpkin,
    Melon,
    Coal,
    IronIngot,
    GoldIngot,
    Diamond,
    Emerald,
    Stone,
    OakLog,
    Custom(String),
}

string_enum_open!(ItemKind, "item kind", {
    Wheat => "wheat",
    Carrot => "carrot",
    Potato => "potato",
    SugarCane => "sugar_cane",
    Pumpkin => "pumpkin",
    Melon => "melon",
    Coal => "coal",
    IronIngot => "iron_ingot",
    GoldIngot => "gold_ingot",
    Diamond => "diamond",
    Emerald => "emerald",
    Stone => "stone",
    OakLog => "oak_log",
});

/// Animal kind used in breeding-rate tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AnimalKind {
    Cow,
    Sheep,
    Pig,
    Chicken,
    Horse,
    Rabbit,
    Custom(String),
}

string_enum_open!(AnimalKind, "animal kind", {
    Cow => "cow",
    Sheep => "sheep",
    Pig => "pig",
    Chicken => "chicken",
    Horse => "horse",
    Rabbit => "rabbit",
});
