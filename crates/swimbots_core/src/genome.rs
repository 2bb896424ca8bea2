//! Genome construction and sexual crossover.
//!
//! The genome data lives in `swimbots_data`; this module adds the logic that
//! needs randomness. Every constructor funnels through [`Genome::new`], so all
//! scalars are clamped or wrapped into their domains on every path.

use crate::error::{Result, SimError};
use crate::math::{lerp, rand_range};
use rand::Rng;
use swimbots_data::{Genome, OceanTraits};

/// Body size range for agents seeded into the world rather than born.
pub const SEEDED_BODY_SIZE: (f64, f64) = (8.0, 13.0);

pub trait GenomeLogic {
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self;
    /// Random genome with a body size drawn from [`SEEDED_BODY_SIZE`].
    fn new_seeded_with_rng<R: Rng>(rng: &mut R) -> Self;
    /// Genome carrying host-supplied personality traits.
    fn with_personality_with_rng<R: Rng>(traits: OceanTraits, rng: &mut R) -> Self;
    fn crossover_with_rng<R: Rng>(&self, other: &Genome, mutation_rate: f64, rng: &mut R)
        -> Genome;
    fn to_hex(&self) -> String;
    fn from_hex(hex_str: &str) -> Result<Self>
    where
        Self: Sized;
}

fn random_traits<R: Rng>(rng: &mut R) -> OceanTraits {
    OceanTraits::new(rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen())
}

impl GenomeLogic for Genome {
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self {
        let hue = rand_range(rng, 0.0, 360.0);
        let body_size = rand_range(rng, 14.0, 22.0);
        let metabolism = rand_range(rng, 0.5, 0.9);
        let lifespan = rand_range(rng, 140.0, 220.0);
        let pref_tol = rand_range(rng, 20.0, 60.0);
        let traits = random_traits(rng);
        Genome::new(hue, body_size, metabolism, lifespan, pref_tol, traits)
    }

    fn new_seeded_with_rng<R: Rng>(rng: &mut R) -> Self {
        let base = Self::new_random_with_rng(rng);
        let body_size = rand_range(rng, SEEDED_BODY_SIZE.0, SEEDED_BODY_SIZE.1);
        Genome::new(
            base.hue,
            body_size,
            base.metabolism,
            base.lifespan,
            base.pref_tol,
            base.traits,
        )
    }

    fn with_personality_with_rng<R: Rng>(traits: OceanTraits, rng: &mut R) -> Self {
        let base = Self::new_seeded_with_rng(rng);
        Genome::new(
            base.hue,
            base.body_size,
            base.metabolism,
            base.lifespan,
            base.pref_tol,
            traits,
        )
    }

    /// Blends two parents. Each scalar draws its own blend weight, and each
    /// scalar independently mutates with probability `mutation_rate`. Hue is
    /// picked from one parent rather than blended, then wrapped.
    fn crossover_with_rng<R: Rng>(
        &self,
        other: &Genome,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Genome {
        let mutation_rate = mutation_rate.clamp(0.0, 1.0);
        let mutates = |rng: &mut R| rng.gen_bool(mutation_rate);

        let picked_hue = if rng.gen_bool(0.5) { self.hue } else { other.hue };
        let hue = if mutates(rng) {
            picked_hue + rand_range(rng, -40.0, 40.0)
        } else {
            picked_hue
        };

        let scaled = |a: f64, b: f64, lo: f64, hi: f64, rng: &mut R| {
            let v = lerp(a, b, rng.gen::<f64>());
            if mutates(rng) {
                v * rand_range(rng, lo, hi)
            } else {
                v
            }
        };
        let body_size = scaled(self.body_size, other.body_size, 0.85, 1.2, rng);
        let metabolism = scaled(self.metabolism, other.metabolism, 0.8, 1.2, rng);
        let lifespan = scaled(self.lifespan, other.lifespan, 0.8, 1.2, rng);

        let shifted = |a: f64, b: f64, delta: f64, rng: &mut R| {
            let v = lerp(a, b, rng.gen::<f64>());
            if mutates(rng) {
                v + rand_range(rng, -delta, delta)
            } else {
                v
            }
        };
        let pref_tol = shifted(self.pref_tol, other.pref_tol, 20.0, rng);
        let (a, b) = (&self.traits, &other.traits);
        let traits = OceanTraits::new(
            shifted(a.o, b.o, 0.2, rng),
            shifted(a.c, b.c, 0.2, rng),
            shifted(a.e, b.e, 0.2, rng),
            shifted(a.a, b.a, 0.2, rng),
            shifted(a.n, b.n, 0.2, rng),
        );

        Genome::new(hue, body_size, metabolism, lifespan, pref_tol, traits)
    }

    fn to_hex(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str).map_err(|e| SimError::genome_decode(e.to_string()))?;
        let raw: Genome =
            serde_json::from_slice(&bytes).map_err(|e| SimError::genome_decode(e.to_string()))?;
        Ok(raw.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_genomes_are_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            assert!(Genome::new_random_with_rng(&mut rng).is_valid());
            let seeded = Genome::new_seeded_with_rng(&mut rng);
            assert!(seeded.is_valid());
            assert!(seeded.body_size >= SEEDED_BODY_SIZE.0 && seeded.body_size < SEEDED_BODY_SIZE.1);
        }
    }

    #[test]
    fn test_crossover_identical_parents_without_mutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let parent = Genome::new_random_with_rng(&mut rng);
        for _ in 0..100 {
            let child = parent.crossover_with_rng(&parent, 0.0, &mut rng);
            assert_eq!(child, parent);
        }
    }

    #[test]
    fn test_crossover_hue_comes_from_a_parent_without_mutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = Genome::new(10.0, 12.0, 0.5, 150.0, 30.0, OceanTraits::uniform(0.1));
        let b = Genome::new(200.0, 25.0, 1.0, 300.0, 90.0, OceanTraits::uniform(0.9));
        let mut seen = (false, false);
        for _ in 0..200 {
            let child = a.crossover_with_rng(&b, 0.0, &mut rng);
            assert!(child.hue == a.hue || child.hue == b.hue);
            seen.0 |= child.hue == a.hue;
            seen.1 |= child.hue == b.hue;
            assert!(child.body_size >= 12.0 && child.body_size <= 25.0);
            assert!(child.traits.o >= 0.1 && child.traits.o <= 0.9);
        }
        assert!(seen.0 && seen.1);
    }

    #[test]
    fn test_crossover_traits_mix_independently() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let a = Genome::new(0.0, 10.0, 0.4, 100.0, 10.0, OceanTraits::uniform(0.0));
        let b = Genome::new(0.0, 30.0, 1.2, 300.0, 110.0, OceanTraits::uniform(1.0));
        let child = a.crossover_with_rng(&b, 0.0, &mut rng);
        let t = child.traits.as_array();
        assert!(t.iter().any(|v| (v - t[0]).abs() > 1e-9));
    }

    #[test]
    fn test_crossover_with_full_mutation_stays_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let a = Genome::new(355.0, 30.0, 1.3, 360.0, 120.0, OceanTraits::uniform(1.0));
        let b = Genome::new(2.0, 8.0, 0.35, 60.0, 5.0, OceanTraits::uniform(0.0));
        for _ in 0..1000 {
            let child = a.crossover_with_rng(&b, 1.0, &mut rng);
            assert!(child.is_valid(), "{child:?}");
        }
    }

    #[test]
    fn test_with_personality_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let g = Genome::with_personality_with_rng(
            OceanTraits {
                o: 1.7,
                c: -0.2,
                e: 0.3,
                a: f64::NAN,
                n: 0.9,
            },
            &mut rng,
        );
        assert_eq!(g.traits.o, 1.0);
        assert_eq!(g.traits.c, 0.0);
        assert_eq!(g.traits.e, 0.3);
        assert_eq!(g.traits.a, 0.5);
        assert!(g.is_valid());
    }

    #[test]
    fn test_hex_round_trip_and_garbage() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = Genome::new_random_with_rng(&mut rng);
        let decoded = Genome::from_hex(&g.to_hex()).unwrap();
        for (x, y) in decoded.traits.as_array().iter().zip(g.traits.as_array()) {
            assert!((x - y).abs() < 1e-12);
        }
        assert!((decoded.lifespan - g.lifespan).abs() < 1e-9);
        assert!(matches!(
            Genome::from_hex("zz"),
            Err(SimError::GenomeDecode(_))
        ));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn test_seeded_genomes_stay_in_domain(seed in any::<u64>()) {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let g = Genome::new_seeded_with_rng(&mut rng);
                prop_assert!(g.is_valid());
                prop_assert!(g.body_size >= SEEDED_BODY_SIZE.0 && g.body_size < SEEDED_BODY_SIZE.1);
            }

            #[test]
            fn test_crossover_of_random_parents_is_valid(
                seed in any::<u64>(),
                rate in 0.0f64..=1.0
            ) {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let a = Genome::new_random_with_rng(&mut rng);
                let b = Genome::new_random_with_rng(&mut rng);
                prop_assert!(a.crossover_with_rng(&b, rate, &mut rng).is_valid());
            }

            #[test]
            fn test_hex_decode_never_panics(input in "[0-9a-f]{0,64}") {
                if let Ok(g) = Genome::from_hex(&input) {
                    prop_assert!(g.is_valid());
                }
            }
        }
    }
}
