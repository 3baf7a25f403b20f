use rand::{Rng, RngCore};

use crate::error::EngineError;
use crate::model::{ItemKind, OreDeposit};

/// Weighted discrete sampler over a fixed set of non-negative weights.
///
/// Candidates are always walked in registration order, so a given seed
/// reproduces an identical index sequence run after run.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    /// Upper bound of the draw interval. Equals the weight sum when
    /// normalized; fixed at 1.0 when a nothing-bucket absorbs the
    /// remainder of an under-unit sum.
    span: f64,
}

impl WeightedSampler {
    /// Sampler whose draw frequencies match `weight[i] / Σweights`.
    /// Every draw selects some index (unless all weights are zero).
    pub fn normalized(weights: &[f64]) -> Result<Self, EngineError> {
        let cumulative = running_sum(weights)?;
        let total = cumulative.last().copied().unwrap_or(0.0);
        Ok(Self {
            cumulative,
            span: total,
        })
    }

    /// Sampler with an implicit "nothing selected" bucket: when the weight
    /// sum is below 1, the remainder draws `None`. Sums of 1 or more behave
    /// like [`WeightedSampler::normalized`].
    pub fn with_remainder(weights: &[f64]) -> Result<Self, EngineError> {
        let cumulative = running_sum(weights)?;
        let total = cumulative.last().copied().unwrap_or(0.0);
        Ok(Self {
            cumulative,
            span: total.max(1.0),
        })
    }

    /// Draw one index. `None` means the nothing-bucket (or an empty/all-zero
    /// weight set).
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<usize> {
        if self.span <= 0.0 {
            return None;
        }
        let r = rng.random_range(0.0..self.span);
        self.cumulative.iter().position(|&cum| r < cum)
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

fn running_sum(weights: &[f64]) -> Result<Vec<f64>, EngineError> {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut total = 0.0;
    for &w in weights {
        if w < 0.0 {
            return Err(EngineError::NegativeWeight(w));
        }
        total += w;
        cumulative.push(total);
    }
    Ok(cumulative)
}

/// One successful ore roll.
#[derive(Debug, Clone, PartialEq)]
pub struct OreDrop {
    pub item: ItemKind,
    pub count: u32,
}

/// Per-territory ore deposit table supporting height-filtered draws.
///
/// Entries keep their insertion order; selection weight per deposit is
/// `min(chance, 1)` and an under-unit weight sum leaves the remainder to
/// the "no drop" outcome.
#[derive(Debug, Clone, Default)]
pub struct OreTable {
    entries: Vec<(ItemKind, OreDeposit)>,
}

impl OreTable {
    pub fn new(entries: Vec<(ItemKind, OreDeposit)>) -> Self {
        Self { entries }
    }

    pub fn from_map<'a>(
        deposits: impl IntoIterator<Item = (&'a ItemKind, &'a OreDeposit)>,
    ) -> Self {
        Self {
            entries: deposits
                .into_iter()
                .map(|(k, d)| (k.clone(), *d))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw at the given height. Deposits whose height band excludes `y`
    /// are filtered out before weighting; when every candidate is filtered
    /// out (or no roll hits) the result is `None`.
    pub fn sample(&self, y: i32, rng: &mut dyn RngCore) -> Option<OreDrop> {
        let candidates: Vec<&(ItemKind, OreDeposit)> = self
            .entries
            .iter()
            .filter(|(_, d)| d.contains_height(y))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let weights: Vec<f64> = candidates
            .iter()
            .map(|(_, d)| d.chance.min(1.0))
            .collect();
        // Weights are clamped non-negative above, so construction cannot fail.
        let sampler = WeightedSampler::with_remainder(&weights).ok()?;
        let index = sampler.sample(rng)?;
        let (item, deposit) = candidates[index];
        Some(OreDrop {
            item: item.clone(),
            count: deposit.roll_count(rng),
        })
    }
}
