use rand::{Rng, RngCore};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default vertical bounds when a deposit omits them (full world column).
const DEFAULT_MIN_HEIGHT: i32 = -64;
const DEFAULT_MAX_HEIGHT: i32 = 320;

/// An ore deposit entry on a territory's resource profile.
///
/// `chance` is the per-roll selection probability in `0..1`; values above 1
/// are guaranteed multi-drops (the rolled quantity is multiplied by
/// `floor(chance)`). Deposits only apply between `min_height` and
/// `max_height` inclusive.
///
/// Document form is a bare number (chance, defaults for the rest) or an
/// array `[chance, min_count, max_count]` /
/// `[chance, min_count, max_count, min_height, max_height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreDeposit {
    pub chance: f64,
    pub min_count: u32,
    pub max_count: u32,
    pub min_height: i32,
    pub max_height: i32,
}

impl OreDeposit {
    pub fn with_chance(chance: f64) -> Self {
        Self {
            chance,
            min_count: 1,
            max_count: 1,
            min_height: DEFAULT_MIN_HEIGHT,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }

    pub fn contains_height(&self, y: i32) -> bool {
        (self.min_height..=self.max_height).contains(&y)
    }

    /// Roll a drop quantity: uniform in `min_count..=max_count`, multiplied
    /// by `floor(chance)` when the deposit is a guaranteed multi-drop.
    pub fn roll_count(&self, rng: &mut dyn RngCore) -> u32 {
        let base = if self.min_count >= self.max_count {
            self.min_count
        } else {
            rng.random_range(self.min_count..=self.max_count)
        };
        let multiplier = if self.chance > 1.0 {
            self.chance.floor() as u32
        } else {
            1
        };
        base * multiplier
    }
}

impl Serialize for OreDeposit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let packed = [
            self.chance,
            f64::from(self.min_count),
            f64::from(self.max_count),
            f64::from(self.min_height),
            f64::from(self.max_height),
        ];
        packed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OreDeposit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Chance(f64),
            Packed(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Chance(chance) => Ok(OreDeposit::with_chance(chance)),
            Repr::Packed(values) => match values.as_slice() {
                [chance, min, max] => Ok(OreDeposit {
                    chance: *chance,
                    min_count: *min as u32,
                    max_count: *max as u32,
                    min_height: DEFAULT_MIN_HEIGHT,
                    max_height: DEFAULT_MAX_HEIGHT,
                }),
                [chance, min, max, min_h, max_h] => Ok(OreDeposit {
                    chance: *chance,
                    min_count: *min as u32,
                    max_count: *max as u32,
                    min_height: *min_h as i32,
                    max_height: *max_h as i32,
                }),
                other => Err(de::Error::custom(format!(
                    "ore deposit array must have 3 or 5 elements, got {}",
                    other.len()
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn bare_chance_form() {
        let d: OreDeposit = serde_json::from_str("0.25").unwrap();
        assert_eq!(d.chance, 0.25);
        assert_eq!((d.min_count, d.max_count), (1, 1));
    }

    #[test]
    fn packed_forms() {
        let d: OreDeposit = serde_json::from_str("[0.5, 1, 4]").unwrap();
        assert_eq!((d.min_count, d.max_count), (1, 4));
        assert_eq!(d.min_height, DEFAULT_MIN_HEIGHT);

        let d: OreDeposit = serde_json::from_str("[0.5, 1, 4, 0, 64]").unwrap();
        assert_eq!((d.min_height, d.max_height), (0, 64));
    }

    #[test]
    fn bad_array_length_rejected() {
        assert!(serde_json::from_str::<OreDeposit>("[0.5, 1]").is_err());
    }

    #[test]
    fn height_bounds_inclusive() {
        let d = OreDeposit {
            chance: 1.0,
            min_count: 1,
            max_count: 1,
            min_height: 5,
            max_height: 12,
        };
        assert!(d.contains_height(5));
        assert!(d.contains_height(12));
        assert!(!d.contains_height(4));
        assert!(!d.contains_height(13));
    }

    #[test]
    fn guaranteed_multi_drop_multiplies_count() {
        let d = OreDeposit {
            chance: 3.0,
            min_count: 2,
            max_count: 2,
            min_height: 0,
            max_height: 255,
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(d.roll_count(&mut rng), 6);
    }

    #[test]
    fn count_within_range() {
        let d = OreDeposit {
            chance: 0.5,
            min_count: 1,
            max_count: 4,
            min_height: 0,
            max_height: 255,
        };
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let n = d.roll_count(&mut rng);
            assert!((1..=4).contains(&n));
        }
    }
}
