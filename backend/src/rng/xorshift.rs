//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG with 64-bit state. One instance is owned by the
//! simulation and every roll (dice, flux, cargo sizes, destination picks)
//! goes through it, so the same seed always replays the same run.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use t5sim_core::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let roll = rng.roll_d6();
/// assert!((1..=6).contains(&roll));
/// let flux = rng.flux();
/// assert!((-5..=5).contains(&flux));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed (zero is mapped to one)
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Current state, enough to resume the sequence later
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// One six-sided die
    pub fn roll_d6(&mut self) -> i32 {
        self.range(1, 7) as i32
    }

    /// Sum of `n` six-sided dice; zero dice roll zero
    ///
    /// ```
    /// use t5sim_core::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.roll_dice(0), 0);
    /// let total = rng.roll_dice(2);
    /// assert!((2..=12).contains(&total));
    /// ```
    pub fn roll_dice(&mut self, n: u32) -> i32 {
        (0..n).map(|_| self.roll_d6()).sum()
    }

    /// Flux roll: one die minus another, in [-5, 5]
    pub fn flux(&mut self) -> i32 {
        self.roll_d6() - self.roll_d6()
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly pick one element, `None` for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.range(0, items.len() as i64) as usize;
        items.get(index)
    }

    /// Sample a log-normal variate with the given underlying normal parameters
    ///
    /// Uses the Box-Muller transform on two uniform draws.
    pub fn lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        // 1 - u keeps the argument of ln strictly positive
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        (mu + sigma * z).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);
        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val), "next_f64() produced {}", val);
        }
    }

    #[test]
    fn test_dice_cover_all_faces() {
        let mut rng = RngManager::new(2024);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let roll = rng.roll_d6();
            assert!((1..=6).contains(&roll));
            seen[(roll - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_flux_bounds() {
        let mut rng = RngManager::new(99);
        for _ in 0..1000 {
            let flux = rng.flux();
            assert!((-5..=5).contains(&flux));
        }
    }

    #[test]
    fn test_choose_empty_is_none() {
        let mut rng = RngManager::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }

    #[test]
    fn test_lognormal_is_positive() {
        let mut rng = RngManager::new(5);
        for _ in 0..1000 {
            let v = rng.lognormal(2.6, 0.7);
            assert!(v.is_finite() && v > 0.0);
        }
    }
}
