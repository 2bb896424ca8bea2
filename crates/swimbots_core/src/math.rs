//! Scalar helpers shared by every simulation component.

use rand::Rng;
use std::f64::consts::PI;

pub const TAU: f64 = 2.0 * PI;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp that tolerates an inverted range by preferring the lower bound,
/// unlike `f64::clamp` which panics.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(x))
}

/// Uniform sample in `[lo, hi)`. Returns `lo` for an empty range.
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..hi)
}

#[inline]
pub fn dist2(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Shortest distance between two hues on the color circle, in [0, 180].
#[inline]
pub fn hue_diff(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).abs() % 360.0;
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Normalizes an angle difference into [-PI, PI].
#[inline]
pub fn wrap_angle(mut a: f64) -> f64 {
    if !a.is_finite() {
        return 0.0;
    }
    a = a.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hue_diff_is_circular() {
        assert_eq!(hue_diff(10.0, 350.0), 20.0);
        assert_eq!(hue_diff(350.0, 10.0), 20.0);
        assert_eq!(hue_diff(0.0, 180.0), 180.0);
        assert_eq!(hue_diff(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_wrap_angle_range() {
        for a in [-10.0, -PI, 0.0, 3.5, 7.0, 100.0] {
            let w = wrap_angle(a);
            assert!((-PI..=PI).contains(&w), "{a} wrapped to {w}");
            assert!(((a - w) / TAU - ((a - w) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 2.0, 1.0), 2.0);
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rand_range(&mut rng, -0.2, 0.2);
            assert!((-0.2..0.2).contains(&v));
        }
        assert_eq!(rand_range(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn test_dist2() {
        assert_eq!(dist2(0.0, 0.0, 3.0, 4.0), 25.0);
    }
}
