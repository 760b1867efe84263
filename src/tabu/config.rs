//! Tabu search configuration.

use crate::quality::Measure;

/// Configuration parameters for the tabu-search refinement.
///
/// # Examples
///
/// ```
/// use fuzzy_epm::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(5000)
///     .with_neighbors_per_iteration(20)
///     .with_seed(42);
/// assert_eq!(config.max_iterations, 5000);
/// assert_eq!(config.neighbors_per_iteration, 20);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Iteration budget of one refinement run. The loop always runs to
    /// this budget (or cancellation); there is no convergence-based exit.
    pub max_iterations: usize,
    /// Candidate neighbors generated and scored per iteration.
    pub neighbors_per_iteration: usize,
    /// Per-bit flip probability when mutating a variable.
    pub mutation_probability: f64,
    /// Tabu list capacity as a fraction of the number of rule variables
    /// (capacity = ceil(fraction * num_variables), at least 1).
    pub tenure_fraction: f64,
    /// Stagnation threshold as a fraction of the iteration budget: after
    /// this many consecutive non-improving iterations the rule is
    /// reinitialized from long-term memory.
    pub stagnation_fraction: f64,
    /// Retry ceiling when searching for a non-tabu, non-duplicate
    /// mutation. On exceeding it the last mutation is accepted anyway.
    pub max_mutation_retries: usize,
    /// Reinitialization direction: `true` rebuilds the stagnating rule
    /// from the most-frequent long-term-memory patterns (intensification),
    /// `false` from the least-frequent ones (diversification).
    pub favor_most_frequent: bool,
    /// How many population members (of distinct quality, best first) the
    /// population entry point will attempt to refine before giving up.
    pub population_attempts: usize,
    /// The quality measure candidates are compared with.
    pub measure: Measure,
    /// Whether to evaluate the dataset pass in parallel with rayon.
    /// Only effective with the `parallel` cargo feature.
    pub parallel: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15_000,
            neighbors_per_iteration: 10,
            mutation_probability: 0.1,
            tenure_fraction: 0.2,
            stagnation_fraction: 0.25,
            max_mutation_retries: 30,
            favor_most_frequent: true,
            population_attempts: 3,
            measure: Measure::WRAccNorm,
            parallel: false,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the number of neighbors generated per iteration.
    pub fn with_neighbors_per_iteration(mut self, n: usize) -> Self {
        self.neighbors_per_iteration = n;
        self
    }

    /// Sets the per-bit mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the tabu tenure fraction.
    pub fn with_tenure_fraction(mut self, f: f64) -> Self {
        self.tenure_fraction = f;
        self
    }

    /// Sets the stagnation threshold fraction.
    pub fn with_stagnation_fraction(mut self, f: f64) -> Self {
        self.stagnation_fraction = f;
        self
    }

    /// Sets the mutation retry ceiling.
    pub fn with_max_mutation_retries(mut self, n: usize) -> Self {
        self.max_mutation_retries = n;
        self
    }

    /// Sets the reinitialization direction.
    pub fn with_favor_most_frequent(mut self, favor: bool) -> Self {
        self.favor_most_frequent = favor;
        self
    }

    /// Sets how many population members are attempted.
    pub fn with_population_attempts(mut self, n: usize) -> Self {
        self.population_attempts = n;
        self
    }

    /// Sets the quality measure.
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.neighbors_per_iteration == 0 {
            return Err("neighbors_per_iteration must be at least 1".into());
        }
        if !(self.mutation_probability > 0.0 && self.mutation_probability <= 1.0) {
            return Err("mutation_probability must be in (0, 1]".into());
        }
        if !(self.tenure_fraction > 0.0 && self.tenure_fraction <= 1.0) {
            return Err("tenure_fraction must be in (0, 1]".into());
        }
        if !(self.stagnation_fraction > 0.0 && self.stagnation_fraction <= 1.0) {
            return Err("stagnation_fraction must be in (0, 1]".into());
        }
        if self.max_mutation_retries == 0 {
            return Err("max_mutation_retries must be at least 1".into());
        }
        if self.population_attempts == 0 {
            return Err("population_attempts must be at least 1".into());
        }
        Ok(())
    }
}
