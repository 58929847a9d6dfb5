//! NSGA-II configuration.
//!
//! [`NsgaConfig`] holds all parameters that control the evolutionary loop.

use super::operators::Crossover;
use super::selection::Selection;
use crate::error::NsgaError;

/// Which population crowding distance is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrowdingScope {
    /// Distances over the whole ranked population at once.
    #[default]
    Population,

    /// Distances within each Pareto front separately (canonical NSGA-II).
    PerFront,
}

/// Configuration for the NSGA-II runner.
///
/// # Defaults
///
/// ```
/// use u_nsga::nsga::NsgaConfig;
///
/// let config = NsgaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.nb_generations, 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_nsga::nsga::{CrowdingScope, NsgaConfig, Selection};
///
/// let config = NsgaConfig::default()
///     .with_population_size(100)
///     .with_selection(Selection::Tournament(3))
///     .with_crowding_scope(CrowdingScope::PerFront)
///     .with_mutation_probability(0.1)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsgaConfig {
    /// Number of individuals kept after each generation.
    ///
    /// `0` is accepted and yields an empty result.
    pub population_size: usize,

    /// Number of generations to run.
    ///
    /// `0` returns the initial sample without evaluating it.
    pub nb_generations: usize,

    /// Per-gene probability of random resetting (0.0–1.0).
    pub mutation_probability: f64,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents pass through as copies.
    pub crossover_probability: f64,

    /// Crossover operator applied to each pair of parents.
    pub crossover: Crossover,

    /// Selection strategy for filling the parent pool.
    pub selection: Selection,

    /// Number of tournaments (or survivors, for truncation) per
    /// generation.
    pub selection_rounds: usize,

    /// Population that crowding distance is measured against.
    pub crowding_scope: CrowdingScope,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            nb_generations: 20,
            mutation_probability: 0.3,
            crossover_probability: 0.5,
            crossover: Crossover::default(),
            selection: Selection::default(),
            selection_rounds: 5,
            crowding_scope: CrowdingScope::default(),
            seed: None,
        }
    }
}

impl NsgaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_nb_generations(mut self, n: usize) -> Self {
        self.nb_generations = n;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, op: Crossover) -> Self {
        self.crossover = op;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k.max(1)))
    }

    /// Sets how many tournaments run per generation (at least 1).
    pub fn with_selection_rounds(mut self, k: usize) -> Self {
        self.selection_rounds = k.max(1);
        self
    }

    pub fn with_crowding_scope(mut self, scope: CrowdingScope) -> Self {
        self.crowding_scope = scope;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Degenerate sizes are valid; only values that would make an operator
    /// misbehave are rejected.
    pub fn validate(&self) -> Result<(), NsgaError> {
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(NsgaError::invalid_config(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(NsgaError::invalid_config(format!(
                "crossover_probability must be in [0, 1], got {}",
                self.crossover_probability
            )));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(NsgaError::invalid_config("tournament size must be at least 1"));
        }
        if self.selection_rounds == 0 {
            return Err(NsgaError::invalid_config("selection_rounds must be at least 1"));
        }
        Ok(())
    }
}
