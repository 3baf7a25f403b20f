//! World/towns document model.
//!
//! These are interchange formats shared with external tools; field names
//! are part of the contract and must not drift. Load ordering contract:
//! the world document is loaded before the towns document, and towns
//! referencing unknown territories or residents are skipped with a
//! warning, never fatally.

pub mod snapshot;
pub mod towns;
pub mod world;

use serde::{Deserialize, Serialize};

pub use snapshot::WorldSnapshot;
pub use towns::{LoadReport, TownsDoc, load_towns, parse_towns_doc};
pub use world::{WorldDoc, load_world, parse_world_doc, reload_territories};

/// `meta` header identifying a document's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    #[serde(rename = "type")]
    pub doc_type: String,
}

impl DocMeta {
    pub fn of(doc_type: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
        }
    }
}
