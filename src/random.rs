use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// uniform draws the search needs. anything implementing `rand::Rng` qualifies,
/// so tests pass a seeded `Pcg32` and get reproducible runs.
pub trait RandomSource {
    /// uniform integer in `lo..=hi`
    fn int_in(&mut self, lo: i32, hi: i32) -> i32;

    /// uniform real in `lo..hi`
    fn real_in(&mut self, lo: f32, hi: f32) -> f32;

    /// uniform real in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn int_in(&mut self, lo: i32, hi: i32) -> i32 {
        self.random_range(lo..=hi)
    }

    #[inline]
    fn real_in(&mut self, lo: f32, hi: f32) -> f32 {
        self.random_range(lo..hi)
    }

    #[inline]
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    #[inline]
    fn index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// seeded when a seed is given, otherwise from OS entropy (differs per run)
pub fn make_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(s) => Pcg32::seed_from_u64(s),
        None => Pcg32::from_os_rng(),
    }
}
