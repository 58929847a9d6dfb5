//! Black-box multi-objective optimization over typed parameters.
//!
//! Provides an NSGA-II evolutionary engine:
//!
//! - **Parameters**: integer, continuous and step-quantized float decision
//!   variables with uniform sampling and repair.
//! - **Dominance engine**: fast non-dominated sorting and crowding
//!   distance, ordering a population by Pareto rank then diversity.
//! - **Evolution loop**: tournament selection, one-point crossover and
//!   random-resetting mutation with elitist parent+offspring replacement,
//!   recording a per-generation history.
//!
//! The fitness function is the only collaborator. It may run arbitrary
//! external work (a building-energy simulation, a network call) and is
//! invoked synchronously, one individual at a time.
//!
//! # Example
//!
//! ```
//! use u_nsga::nsga::{evolve, Arguments, NsgaConfig, Parameter};
//!
//! let params = vec![
//!     Parameter::float("x", 0.0, 10.0).unwrap(),
//! ];
//! // two conflicting objectives, both maximized
//! let fitness = |a: &Arguments<'_>| {
//!     let x = a.f64("x");
//!     [x, 10.0 - x]
//! };
//! let config = NsgaConfig::default().with_seed(7);
//!
//! let result = evolve(params, &fitness, vec![1.0, 1.0], config).unwrap();
//! assert!(result.pareto_front().count() > 1);
//! ```

pub mod error;
pub mod nsga;
pub mod random;

pub use error::NsgaError;
