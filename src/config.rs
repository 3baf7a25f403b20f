/// Engine tunables.
///
/// Every knob is a named typed field; hosts construct this once at startup
/// and pass it into [`crate::state::WorldState`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base claim cost of any territory before resource node deltas.
    pub territory_cost_base: f64,
    /// Base per-chunk cost multiplier before resource node scales.
    pub territory_cost_scale: f64,
    /// Claim power every town starts from, before residents and bonuses.
    pub town_claims_base: i64,
    /// Hard ceiling on a town's claim power.
    pub town_claims_ceiling: i64,
    /// Claim power a newly registered resident contributes.
    pub resident_claims_initial: i64,
    /// Cap on a single resident's claim power contribution.
    pub resident_claims_max: i64,
    /// Seconds of online play before a resident's claim power steps up.
    pub claims_ramp_period: f64,
    /// Claim power gained per ramp period.
    pub claims_ramp_step: i64,
    /// Seconds before an unclaim penalty decays by one step.
    pub penalty_decay_period: f64,
    /// Penalty removed per decay period.
    pub penalty_decay_amount: i64,
    /// Income multiplier (0..1) the host's income tick applies while a
    /// town is over its claim power, surfaced through
    /// [`crate::state::WorldState::town_income_multiplier`].
    pub over_claims_income_penalty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            territory_cost_base: 10.0,
            territory_cost_scale: 0.25,
            town_claims_base: 20,
            town_claims_ceiling: 100,
            resident_claims_initial: 5,
            resident_claims_max: 20,
            claims_ramp_period: 3600.0,
            claims_ramp_step: 1,
            penalty_decay_period: 1200.0,
            penalty_decay_amount: 1,
            over_claims_income_penalty: 0.5,
        }
    }
}
