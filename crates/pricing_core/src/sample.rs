//! Seeded standard-normal sample source.
//!
//! Both backends consume the *same* sample array, so the source must be
//! reproducible: the same seed always yields the same sequence. Samples
//! are `f32` because that is the accelerator's wire format; the software
//! path consumes the identical 32-bit values to keep the comparison fair.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Reproducible source of IID standard-normal `f32` draws.
///
/// # Examples
///
/// ```rust
/// use pricing_core::SampleSource;
///
/// let a = SampleSource::from_seed(42).draw(8);
/// let b = SampleSource::from_seed(42).draw(8);
/// assert_eq!(a, b);
/// ```
pub struct SampleSource {
    inner: StdRng,
    seed: u64,
}

impl SampleSource {
    /// Creates a source initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws exactly `n` standard-normal samples.
    pub fn draw(&mut self, n: usize) -> Vec<f32> {
        let mut samples = vec![0.0f32; n];
        self.fill_normal(&mut samples);
        samples
    }

    /// Fills the buffer with standard-normal variates.
    ///
    /// Zero-allocation; empty buffers are a no-op.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f32]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}
