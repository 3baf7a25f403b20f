//! Claims-power economy: budget recomputation and the two periodic ticks.
//!
//! Both ticks take elapsed time from the host scheduler and bank it in
//! accumulators, so drift or double-delivery in the host's timer never
//! double-applies an interval.

use std::collections::HashSet;

use crate::model::TownId;

use super::WorldState;

impl WorldState {
    /// Recompute a town's claim budget:
    /// `clamp(0, ceiling, base - penalty + Σ resident claims + bonus - annexed)`
    /// and refresh the over-budget flag. No-op for unknown towns.
    pub(crate) fn recompute_town_claims(&mut self, town_id: TownId) {
        let Some(town) = self.towns.get(&town_id) else {
            return;
        };
        let resident_claims: i64 = town
            .residents
            .iter()
            .filter_map(|uuid| self.residents.get(uuid))
            .map(|r| r.claims)
            .sum();
        let raw = self.config.town_claims_base - town.claims_penalty + resident_claims
            + town.claims_bonus
            - town.claims_annexed;
        let town = self.towns.get_mut(&town_id).expect("checked above");
        town.claims_max = raw.clamp(0, self.config.town_claims_ceiling);
        town.is_over_claims_max = town.claims_used > town.claims_max;
    }

    /// Income multiplier the host's income tick should apply for a town:
    /// the configured penalty multiplier while the town is over its claim
    /// budget, 1.0 otherwise (including for unknown towns).
    pub fn town_income_multiplier(&self, town_id: TownId) -> f64 {
        match self.towns.get(&town_id) {
            Some(town) if town.is_over_claims_max => self.config.over_claims_income_penalty,
            _ => 1.0,
        }
    }

    /// Penalty decay tick. Towns with `claims_penalty > 0` bank `dt`; each
    /// full decay period removes one decay step (floor 0) and refreshes the
    /// budget. Zero-penalty towns are skipped entirely.
    pub fn tick_penalty_decay(&mut self, dt: f64) {
        let period = self.config.penalty_decay_period;
        let amount = self.config.penalty_decay_amount;
        if period <= 0.0 {
            return;
        }
        let penalized: Vec<TownId> = self
            .towns
            .values()
            .filter(|t| t.claims_penalty > 0)
            .map(|t| t.id)
            .collect();
        for town_id in penalized {
            let town = self.towns.get_mut(&town_id).expect("collected above");
            town.claims_penalty_time += dt;
            let mut changed = false;
            while town.claims_penalty_time >= period && town.claims_penalty > 0 {
                town.claims_penalty_time -= period;
                town.claims_penalty = (town.claims_penalty - amount).max(0);
                changed = true;
            }
            if town.claims_penalty == 0 {
                town.claims_penalty_time = 0.0;
            }
            if changed {
                self.recompute_town_claims(town_id);
            }
        }
    }

    /// Power ramp tick for online residents below the claim-power cap.
    /// Each full ramp period adds one step (capped) and refreshes the
    /// resident's town budget. Offline residents are skipped entirely.
    pub fn tick_power_ramp(&mut self, dt: f64, online: &HashSet<String>) {
        let period = self.config.claims_ramp_period;
        let step = self.config.claims_ramp_step;
        let cap = self.config.resident_claims_max;
        if period <= 0.0 {
            return;
        }
        let mut touched_towns = Vec::new();
        for uuid in online {
            let Some(resident) = self.residents.get_mut(uuid) else {
                continue;
            };
            if resident.claims >= cap {
                continue;
            }
            resident.claims_time += dt;
            let mut changed = false;
            while resident.claims_time >= period && resident.claims < cap {
                resident.claims_time -= period;
                resident.claims = (resident.claims + step).min(cap);
                changed = true;
            }
            if resident.claims >= cap {
                resident.claims_time = 0.0;
            }
            if changed {
                if let Some(town_id) = resident.town {
                    touched_towns.push(town_id);
                }
            }
        }
        touched_towns.sort_unstable();
        touched_towns.dedup();
        for town_id in touched_towns {
            self.recompute_town_claims(town_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::TerritoryId;
    use crate::testutil::state_with_line_config;

    fn config() -> EngineConfig {
        EngineConfig {
            penalty_decay_period: 100.0,
            penalty_decay_amount: 2,
            claims_ramp_period: 60.0,
            claims_ramp_step: 1,
            resident_claims_max: 8,
            resident_claims_initial: 5,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn claims_max_formula_and_clamp() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();

        // base 20 + resident 5 = 25
        assert_eq!(state.town(a).unwrap().claims_max, 25);

        state.towns.get_mut(&a).unwrap().claims_bonus = 500;
        state.recompute_town_claims(a);
        assert_eq!(state.town(a).unwrap().claims_max, 100, "ceiling clamp");

        state.towns.get_mut(&a).unwrap().claims_bonus = 0;
        state.towns.get_mut(&a).unwrap().claims_penalty = 900;
        state.recompute_town_claims(a);
        assert_eq!(state.town(a).unwrap().claims_max, 0, "floor clamp");
    }

    #[test]
    fn over_claims_flag_follows_budget() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        assert!(!state.town(a).unwrap().is_over_claims_max);

        state.towns.get_mut(&a).unwrap().claims_penalty = 20;
        state.recompute_town_claims(a);
        // max = clamp(0,100, 20-20+5) = 5 < used 11
        assert!(state.town(a).unwrap().is_over_claims_max);
    }

    #[test]
    fn income_multiplier_tracks_over_claims_flag() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        assert_eq!(state.town_income_multiplier(a), 1.0);

        state.towns.get_mut(&a).unwrap().claims_penalty = 20;
        state.recompute_town_claims(a);
        assert_eq!(
            state.town_income_multiplier(a),
            state.config.over_claims_income_penalty
        );
    }

    #[test]
    fn penalty_decays_after_full_period() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        state.towns.get_mut(&a).unwrap().claims_penalty = 5;
        state.recompute_town_claims(a);

        state.tick_penalty_decay(60.0);
        assert_eq!(state.town(a).unwrap().claims_penalty, 5, "period not reached");
        state.tick_penalty_decay(60.0);
        let town = state.town(a).unwrap();
        assert_eq!(town.claims_penalty, 3);
        assert!((town.claims_penalty_time - 20.0).abs() < 1e-9, "remainder banked");
    }

    #[test]
    fn penalty_floors_at_zero_and_resets_accumulator() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        state.towns.get_mut(&a).unwrap().claims_penalty = 1;

        state.tick_penalty_decay(100.0);
        let town = state.town(a).unwrap();
        assert_eq!(town.claims_penalty, 0);
        assert_eq!(town.claims_penalty_time, 0.0);

        // Fully decayed towns are skipped on later ticks.
        state.tick_penalty_decay(1000.0);
        assert_eq!(state.town(a).unwrap().claims_penalty_time, 0.0);
    }

    #[test]
    fn large_dt_applies_multiple_periods() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        state.towns.get_mut(&a).unwrap().claims_penalty = 10;

        state.tick_penalty_decay(350.0);
        assert_eq!(state.town(a).unwrap().claims_penalty, 4, "three periods");
    }

    #[test]
    fn power_ramp_raises_online_resident_claims() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let a = state.create_town("Ironhold", "u-1", TerritoryId(1)).unwrap();
        let online: HashSet<String> = ["u-1".to_string()].into_iter().collect();

        state.tick_power_ramp(60.0, &online);
        assert_eq!(state.resident("u-1").unwrap().claims, 6);
        assert_eq!(state.town(a).unwrap().claims_max, 26, "town budget follows");
    }

    #[test]
    fn power_ramp_skips_offline_residents() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        state.add_resident("u-2", "Bob");
        let online: HashSet<String> = ["u-1".to_string()].into_iter().collect();

        state.tick_power_ramp(120.0, &online);
        assert_eq!(state.resident("u-1").unwrap().claims, 7);
        assert_eq!(state.resident("u-2").unwrap().claims, 5);
        assert_eq!(state.resident("u-2").unwrap().claims_time, 0.0);
    }

    #[test]
    fn power_ramp_caps_at_max() {
        let mut state = state_with_line_config(2, config());
        state.add_resident("u-1", "Alice");
        let online: HashSet<String> = ["u-1".to_string()].into_iter().collect();

        state.tick_power_ramp(100_000.0, &online);
        let resident = state.resident("u-1").unwrap();
        assert_eq!(resident.claims, 8, "capped");
        assert_eq!(resident.claims_time, 0.0, "accumulator reset at cap");

        state.tick_power_ramp(60.0, &online);
        assert_eq!(state.resident("u-1").unwrap().claims, 8);
    }
}
