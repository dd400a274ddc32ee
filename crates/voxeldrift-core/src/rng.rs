//! RNG trait abstraction for the engine
//!
//! The engine never owns a generator. Commands that need randomness (load-time
//! color jitter, the dismantle impulse) take one as a parameter so that:
//! - hosts can pass `rand::thread_rng()`
//! - tests and replays can pass a seeded `Xoshiro256StarStar`

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Seedable generator used by hosts that want reproducible runs
pub type SeededRng = Xoshiro256StarStar;

/// Build a [`SeededRng`] from a 64-bit seed
pub fn seeded(seed: u64) -> SeededRng {
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// Random number source for the engine
pub trait VoxelRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Uniform value in [-half_range, half_range)
    fn gen_signed(&mut self, half_range: f32) -> f32 {
        (self.gen_f32() * 2.0 - 1.0) * half_range
    }

    /// Uniform value in [min, max)
    fn gen_between(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.gen_f32()
    }
}

// Covers ThreadRng, StdRng, the xoshiro family and rand's mock generators
impl<T: ?Sized + rand::Rng> VoxelRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
