//! Benchmark support for the conclust workspace.
//!
//! Provides deterministic synthetic condensed inputs so benchmark runs are
//! reproducible under a fixed seed.

pub mod source {
    //! Synthetic condensed dissimilarity generation.

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use conclust_core::Dissimilarity;

    /// Configuration for synthetic condensed input generation.
    #[derive(Clone, Copy, Debug)]
    pub struct SyntheticConfig {
        /// Number of observations.
        pub observations: usize,
        /// RNG seed; equal seeds produce equal inputs.
        pub seed: u64,
    }

    /// Generates a uniform random condensed dissimilarity input.
    ///
    /// # Panics
    /// Panics when `observations < 2`; benchmark configurations are fixed
    /// constants.
    #[must_use]
    pub fn generate(config: &SyntheticConfig) -> Dissimilarity {
        let n = config.observations;
        assert!(n >= 2, "benchmarks need at least two observations");
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let values = (0..n * (n - 1) / 2)
            .map(|_| rng.gen_range(0.0..100.0))
            .collect();
        Dissimilarity::from_condensed(n, values)
            .unwrap_or_else(|err| panic!("synthetic input must be valid: {err}"))
    }
}
