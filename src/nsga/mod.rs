//! NSGA-II multi-objective evolutionary optimizer.
//!
//! Optimizes a black-box fitness function over a set of typed decision
//! parameters. The fitness function may return one score or several; each
//! score is multiplied by a signed weight (positive = maximize,
//! negative = minimize) and the engine maximizes the weighted scores.
//!
//! # Core Types
//!
//! - [`Parameter`]: a named decision variable (integer, float, stepped float)
//! - [`Individual`]: genes plus cached weighted scores, rank and crowding distance
//! - [`FitnessFunction`]: the evaluation contract, with named [`Arguments`]
//!
//! # Key Types
//!
//! - [`NsgaConfig`]: algorithm parameters (population, generations, operator rates)
//! - [`NsgaRunner`]: executes the generational loop
//! - [`NsgaResult`]: best individual, final population and [`History`]
//!
//! # Submodules
//!
//! - [`operators`]: random-resetting mutation, one- and two-point crossover
//! - [`dominance`]: dominance, non-dominated sorting and crowding distance
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod dominance;
mod history;
mod individual;
pub mod operators;
mod param;
mod runner;
mod selection;

pub use config::{CrowdingScope, NsgaConfig};
pub use history::{Generation, GenerationStats, History};
pub use individual::{
    fallible, Arguments, Fallible, FitnessFunction, Individual, ObjectiveList, Scores,
};
pub use operators::Crossover;
pub use param::{check_unique_names, Domain, Parameter, Value};
pub use runner::{evolve, NsgaResult, NsgaRunner};
pub use selection::Selection;
