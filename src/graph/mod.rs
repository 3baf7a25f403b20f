pub mod builder;
pub mod cost;

pub use builder::{compile_partial, compile_world};
pub use cost::territory_cost;
