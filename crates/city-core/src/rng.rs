//! Deterministic seeded randomness.
//!
//! Two flavors, both reproducible from an integer key:
//!
//! - [`unit`] is a stateless single-draw function: one seed in, one value in
//!   [0, 1) out. Used wherever a record or path segment needs exactly one
//!   reproducible decision (color hue offsets, shape picks).
//! - [`stream`] wraps `SmallRng` for consumers that draw many values from
//!   one key (free-roam path regeneration). Stream seeds are derived from
//!   agent identity so whole-scene construction is a pure function of the
//!   root seed.
//!
//! The mixer is SplitMix64 (Steele, Lea & Flood, 2014). Integer mixing is
//! deliberate: it is bit-identical across platforms, compilers, and
//! optimization levels, which trigonometric hashing is not.

use rand::rngs::SmallRng;
use rand::SeedableRng;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// One SplitMix64 step: advance `seed` by the golden gamma and finalize.
///
/// `mix(0)` is pinned to the published test vector in the tests below; any
/// change to these constants is a break in scene reproducibility.
pub fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map an integer key to a reproducible value in [0, 1).
///
/// Stateless: the same seed returns the same bits on every call, in every
/// process, on every platform. The upper 53 bits of the mixed value fill the
/// f64 mantissa.
pub fn unit(seed: i64) -> f64 {
    (mix(seed as u64) >> 11) as f64 / (1u64 << 53) as f64
}

/// A deterministic multi-draw stream for the given key.
pub fn stream(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(mix(seed))
}

/// Stable 64-bit hash of a string (FNV-1a), for deriving seeds from
/// record identifiers.
pub fn hash_str(s: &str) -> u64 {
    let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_mix_known_vector() {
        // Published SplitMix64 test vector for an initial state of 0.
        assert_eq!(mix(0), 0xE220_A839_7B1D_CDAF);
    }

    #[test]
    fn test_unit_is_bit_identical() {
        for seed in [0i64, 1, -1, 42, i64::MAX, i64::MIN] {
            assert_eq!(unit(seed).to_bits(), unit(seed).to_bits());
        }
    }

    #[test]
    fn test_unit_matches_mixer_output() {
        // The unit value is exactly the top 53 bits of the mixed seed.
        let expected = (mix(42) >> 11) as f64 / (1u64 << 53) as f64;
        assert_eq!(unit(42).to_bits(), expected.to_bits());
    }

    #[test]
    fn test_unit_range() {
        for seed in -500i64..500 {
            let v = unit(seed * 7919);
            assert!((0.0..1.0).contains(&v), "unit({}) = {} out of range", seed, v);
        }
    }

    #[test]
    fn test_nearby_seeds_diverge() {
        // Adjacent keys must not produce visibly correlated values.
        let a = unit(1000);
        let b = unit(1001);
        assert!((a - b).abs() > 1e-6);
    }

    #[test]
    fn test_stream_determinism() {
        let mut s1 = stream(7);
        let mut s2 = stream(7);
        let v1: Vec<f64> = (0..100).map(|_| s1.gen()).collect();
        let v2: Vec<f64> = (0..100).map(|_| s2.gen()).collect();
        assert_eq!(v1, v2, "streams with the same seed should be identical");
    }

    #[test]
    fn test_stream_different_seeds() {
        let mut s1 = stream(7);
        let mut s2 = stream(8);
        let v1: Vec<f64> = (0..10).map(|_| s1.gen()).collect();
        let v2: Vec<f64> = (0..10).map(|_| s2.gen()).collect();
        assert_ne!(v1, v2, "different seeds should produce different streams");
    }

    #[test]
    fn test_hash_str_stable() {
        assert_eq!(hash_str("proj_flowcache"), hash_str("proj_flowcache"));
        assert_ne!(hash_str("proj_flowcache"), hash_str("proj_gridplot"));
        // FNV-1a of the empty string is the offset basis.
        assert_eq!(hash_str(""), 0xCBF2_9CE4_8422_2325);
    }
}
