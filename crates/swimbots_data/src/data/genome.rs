use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Domain of body size accepted at construction.
pub const BODY_SIZE_DOMAIN: RangeInclusive<f64> = 8.0..=30.0;
/// Domain of the metabolism rate multiplier.
pub const METABOLISM_DOMAIN: RangeInclusive<f64> = 0.35..=1.3;
/// Domain of lifespan in simulated seconds.
pub const LIFESPAN_DOMAIN: RangeInclusive<f64> = 60.0..=360.0;
/// Domain of the mate preference tolerance in hue degrees.
pub const PREF_TOL_DOMAIN: RangeInclusive<f64> = 5.0..=120.0;

/// Five normalized personality scalars (openness, conscientiousness,
/// extraversion, agreeableness, neuroticism).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanTraits {
    pub o: f64,
    pub c: f64,
    pub e: f64,
    pub a: f64,
    pub n: f64,
}

impl Default for OceanTraits {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

impl OceanTraits {
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v, v)
    }

    /// Builds a trait vector, clamping every component into [0, 1].
    /// Non-finite components fall back to 0.5.
    pub fn new(o: f64, c: f64, e: f64, a: f64, n: f64) -> Self {
        Self {
            o: unit(o),
            c: unit(c),
            e: unit(e),
            a: unit(a),
            n: unit(n),
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.o, self.c, self.e, self.a, self.n]
    }

    pub fn is_normalized(&self) -> bool {
        self.as_array()
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

fn unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn within(v: f64, domain: &RangeInclusive<f64>) -> f64 {
    if v.is_finite() {
        v.clamp(*domain.start(), *domain.end())
    } else {
        *domain.start()
    }
}

/// Wraps an angle in degrees into [0, 360).
pub fn wrap_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Heritable traits of an agent. Immutable once the agent is born.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub hue: f64,
    pub body_size: f64,
    pub metabolism: f64,
    pub lifespan: f64,
    pub pref_tol: f64,
    pub traits: OceanTraits,
}

impl Genome {
    /// Creates a genome with every scalar clamped or wrapped into its domain.
    pub fn new(
        hue: f64,
        body_size: f64,
        metabolism: f64,
        lifespan: f64,
        pref_tol: f64,
        traits: OceanTraits,
    ) -> Self {
        Self {
            hue: wrap_hue(hue),
            body_size: within(body_size, &BODY_SIZE_DOMAIN),
            metabolism: within(metabolism, &METABOLISM_DOMAIN),
            lifespan: within(lifespan, &LIFESPAN_DOMAIN),
            pref_tol: within(pref_tol, &PREF_TOL_DOMAIN),
            traits: OceanTraits::new(traits.o, traits.c, traits.e, traits.a, traits.n),
        }
    }

    /// Copy with every scalar pulled back into its domain. Genomes built as
    /// struct literals or decoded from external input go through this.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.hue,
            self.body_size,
            self.metabolism,
            self.lifespan,
            self.pref_tol,
            self.traits,
        )
    }

    /// True when every scalar sits inside its domain.
    pub fn is_valid(&self) -> bool {
        (0.0..360.0).contains(&self.hue)
            && BODY_SIZE_DOMAIN.contains(&self.body_size)
            && METABOLISM_DOMAIN.contains(&self.metabolism)
            && LIFESPAN_DOMAIN.contains(&self.lifespan)
            && PREF_TOL_DOMAIN.contains(&self.pref_tol)
            && self.traits.is_normalized()
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self::new(180.0, 18.0, 0.7, 180.0, 40.0, OceanTraits::default())
    }
}
