//! NSGA-II evolutionary loop execution.
//!
//! [`NsgaRunner`] owns everything one optimization run needs (parameter
//! set, objective weights, configuration and its own random stream) and
//! drives the generational state machine:
//!
//! ```text
//! Init → Evaluating → Ranking → Selecting → Varying → Replacing ─┐
//!             ▲                                                  │
//!             └──────────── next generation ─────────────────────┤
//!                                                                ▼
//!                                                              Done
//! ```
//!
//! Replacement is elitist: parents and offspring are merged, re-ranked and
//! truncated back to `population_size` by rank, then crowding distance.

use super::config::NsgaConfig;
use super::dominance::{rank_population, truncate};
use super::history::{Generation, History};
use super::individual::{FitnessFunction, Individual};
use super::operators::mutate;
use super::param::{check_unique_names, Parameter, Value};
use crate::error::NsgaError;
use crate::random::create_rng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{debug, info, instrument, trace};

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct NsgaResult {
    /// First individual of the final population: rank 0 with the largest
    /// crowding distance. `None` only when `population_size == 0`.
    ///
    /// With `nb_generations == 0` this is the first initial sample,
    /// unranked and unevaluated.
    pub best: Option<Individual>,

    /// The final population, best first.
    pub population: Vec<Individual>,

    /// One snapshot per generation.
    pub history: History,

    /// Number of generations executed.
    pub generations: usize,

    /// Number of fitness-function calls made.
    pub evaluations: usize,
}

impl NsgaResult {
    /// Decision values of the best individual (empty if there is none).
    pub fn best_genes(&self) -> &[Value] {
        match &self.best {
            Some(b) => &b.genes,
            None => &[],
        }
    }

    /// Weighted objective scores of the best individual (empty if there is
    /// none or it was never evaluated).
    pub fn best_scores(&self) -> &[f64] {
        match &self.best {
            Some(b) => &b.objectives,
            None => &[],
        }
    }

    /// Rank-0 members of the final population.
    pub fn pareto_front(&self) -> impl Iterator<Item = &Individual> {
        self.population.iter().filter(|i| i.rank == Some(0))
    }

    /// Splits the result into `(best genes, best scores, history)`.
    pub fn into_parts(self) -> (Vec<Value>, Vec<f64>, History) {
        let (genes, scores) = match self.best {
            Some(b) => (b.genes, b.objectives),
            None => (Vec::new(), Vec::new()),
        };
        (genes, scores, self.history)
    }
}

/// States of the generational loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Evaluating,
    Ranking,
    Selecting,
    Varying,
    Replacing,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Evaluating => "evaluating",
            Phase::Ranking => "ranking",
            Phase::Selecting => "selecting",
            Phase::Varying => "varying",
            Phase::Replacing => "replacing",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Executes the NSGA-II loop.
///
/// A runner is built per optimization and consumed by [`run`](Self::run);
/// nothing is shared between runners, so independent runs may proceed on
/// different threads as long as each has its own seed.
///
/// # Usage
///
/// ```
/// use u_nsga::nsga::{Arguments, NsgaConfig, NsgaRunner, Parameter};
///
/// let params = vec![Parameter::float("x", -10.0, 10.0).unwrap()];
/// let config = NsgaConfig::default()
///     .with_population_size(20)
///     .with_nb_generations(10)
///     .with_seed(42);
///
/// // minimize x²
/// let runner = NsgaRunner::new(params, vec![-1.0], config).unwrap();
/// let result = runner.run(&|a: &Arguments<'_>| a.f64("x").powi(2)).unwrap();
/// assert_eq!(result.best.unwrap().rank, Some(0));
/// ```
#[derive(Debug)]
pub struct NsgaRunner {
    parameters: Vec<Parameter>,
    weights: Vec<f64>,
    config: NsgaConfig,
    rng: StdRng,
    evaluations: usize,
}

impl NsgaRunner {
    /// Validates the inputs and seeds the runner's random stream.
    ///
    /// # Errors
    /// - [`NsgaError::DuplicateParameter`] if two parameters share a name
    /// - [`NsgaError::InvalidWeights`] if `weights` is empty or contains a
    ///   zero or non-finite weight
    /// - [`NsgaError::InvalidConfig`] if [`NsgaConfig::validate`] fails
    pub fn new(
        parameters: Vec<Parameter>,
        weights: Vec<f64>,
        config: NsgaConfig,
    ) -> Result<Self, NsgaError> {
        check_unique_names(&parameters)?;
        check_weights(&weights)?;
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        Ok(Self {
            parameters,
            weights,
            config,
            rng,
            evaluations: 0,
        })
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn config(&self) -> &NsgaConfig {
        &self.config
    }

    /// Runs the optimization to completion.
    ///
    /// # Errors
    /// Fails on the first evaluation that returns the wrong number of
    /// scores, a NaN or infinite score, or whose fitness function fails.
    /// No partial result is returned in that case.
    pub fn run<F: FitnessFunction>(self, fitness: &F) -> Result<NsgaResult, NsgaError> {
        self.run_with_observer(fitness, |_| {})
    }

    /// Runs the optimization, calling `observer` with every generation
    /// snapshot as soon as it is recorded.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            population_size = self.config.population_size,
            nb_generations = self.config.nb_generations,
            objectives = self.weights.len(),
        )
    )]
    pub fn run_with_observer<F, O>(
        mut self,
        fitness: &F,
        mut observer: O,
    ) -> Result<NsgaResult, NsgaError>
    where
        F: FitnessFunction,
        O: FnMut(&Generation),
    {
        let population_size = self.config.population_size;
        let nb_generations = self.config.nb_generations;
        info!(
            parameters = self.parameters.len(),
            "starting NSGA-II run"
        );

        let mut history = History::with_capacity(nb_generations);
        let mut population: Vec<Individual> = Vec::new();
        let mut pool: Vec<Individual> = Vec::new();
        let mut offspring: Vec<Individual> = Vec::new();
        let mut generation = 0usize;
        let mut phase = Phase::Init;

        while phase != Phase::Done {
            trace!(generation, %phase, "entering phase");
            phase = match phase {
                Phase::Init => {
                    population = (0..population_size)
                        .map(|_| Individual::sample(&self.parameters, &mut self.rng))
                        .collect();
                    if population_size == 0 || nb_generations == 0 {
                        Phase::Done
                    } else {
                        Phase::Evaluating
                    }
                }
                Phase::Evaluating => {
                    for ind in population.iter_mut().filter(|i| !i.is_evaluated()) {
                        self.evaluate(ind, fitness)?;
                    }
                    Phase::Ranking
                }
                Phase::Ranking => {
                    rank_population(&mut population, self.config.crowding_scope);
                    Phase::Selecting
                }
                Phase::Selecting => {
                    pool = self.config.selection.select(
                        &population,
                        self.config.selection_rounds,
                        &mut self.rng,
                    );
                    Phase::Varying
                }
                Phase::Varying => {
                    offspring = self.vary(&pool, fitness)?;
                    Phase::Replacing
                }
                Phase::Replacing => {
                    population.append(&mut offspring);
                    let fronts = rank_population(&mut population, self.config.crowding_scope);
                    truncate(&mut population, population_size);

                    let snapshot = history.record(&population, fronts);
                    debug!(
                        generation = snapshot.index,
                        fronts,
                        front_size = snapshot.stats.front_size,
                        best = ?snapshot.stats.best,
                        "generation complete"
                    );
                    observer(snapshot);

                    generation += 1;
                    if generation < nb_generations {
                        Phase::Evaluating
                    } else {
                        Phase::Done
                    }
                }
                Phase::Done => Phase::Done,
            };
        }

        let best = population.first().cloned();
        info!(
            generations = generation,
            evaluations = self.evaluations,
            best = ?best.as_ref().map(|b| &b.objectives),
            "NSGA-II run finished"
        );

        Ok(NsgaResult {
            best,
            population,
            history,
            generations: generation,
            evaluations: self.evaluations,
        })
    }

    /// Crossover then mutation over consecutive pool pairs until
    /// `population_size` offspring exist. Changed children are evaluated.
    fn vary<F: FitnessFunction>(
        &mut self,
        pool: &[Individual],
        fitness: &F,
    ) -> Result<Vec<Individual>, NsgaError> {
        let target = self.config.population_size;
        let mut offspring = Vec::with_capacity(target);
        if pool.is_empty() {
            return Ok(offspring);
        }

        let mut i = 0;
        while offspring.len() < target {
            let parent1 = &pool[i % pool.len()];
            let parent2 = &pool[(i + 1) % pool.len()];
            i += 2;

            let (c1, c2) = self.config.crossover.apply(
                parent1,
                parent2,
                self.config.crossover_probability,
                &mut self.rng,
            );
            for child in [c1, c2] {
                if offspring.len() >= target {
                    break;
                }
                let mut child = mutate(
                    &child,
                    &self.parameters,
                    self.config.mutation_probability,
                    &mut self.rng,
                );
                if !child.is_evaluated() {
                    self.evaluate(&mut child, fitness)?;
                }
                offspring.push(child);
            }
        }
        Ok(offspring)
    }

    fn evaluate<F: FitnessFunction>(
        &mut self,
        individual: &mut Individual,
        fitness: &F,
    ) -> Result<(), NsgaError> {
        self.evaluations += 1;
        individual.evaluate(&self.parameters, fitness, &self.weights)
    }
}

/// Runs one optimization with a fresh runner.
///
/// Shorthand for `NsgaRunner::new(parameters, weights, config)?.run(fitness)`.
pub fn evolve<F: FitnessFunction>(
    parameters: Vec<Parameter>,
    fitness: &F,
    weights: Vec<f64>,
    config: NsgaConfig,
) -> Result<NsgaResult, NsgaError> {
    NsgaRunner::new(parameters, weights, config)?.run(fitness)
}

fn check_weights(weights: &[f64]) -> Result<(), NsgaError> {
    if weights.is_empty() {
        return Err(NsgaError::invalid_weights("at least one objective weight is required"));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w == 0.0) {
        return Err(NsgaError::invalid_weights(format!(
            "weights must be finite and non-zero, got {w}"
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
