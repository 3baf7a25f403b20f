/// Claim cost of a territory from its composed cost accumulators.
///
/// `cost_constant` is the global base plus every assigned node's constant;
/// `cost_scale` is the global base multiplied by every assigned node's
/// scale. Order-independent: node priority only affects map-key overwrite
/// order, never scalar accumulation.
pub fn territory_cost(chunk_count: usize, cost_constant: f64, cost_scale: f64) -> i64 {
    (cost_constant + cost_scale * chunk_count as f64).round() as i64
}
