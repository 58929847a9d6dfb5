//! Candidate solutions and the fitness-function contract.
//!
//! An [`Individual`] carries its decision values (`genes`), the weighted
//! objective scores of its last evaluation, and the Pareto rank and
//! crowding distance assigned by the dominance engine.
//!
//! The fitness function is the engine's only collaborator. It receives the
//! genes bound to parameter names through [`Arguments`] and returns one
//! score per objective as [`Scores`].

use super::param::{Parameter, Value};
use crate::error::NsgaError;
use rand::Rng;
use std::convert::Infallible;

/// Raw scores returned by a fitness function.
#[derive(Debug, Clone, PartialEq)]
pub enum Scores {
    /// Single-objective mode.
    Single(f64),
    /// Multi-objective mode, one score per registered objective.
    Multi(Vec<f64>),
}

impl Scores {
    pub fn len(&self) -> usize {
        match self {
            Scores::Single(_) => 1,
            Scores::Multi(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Scores::Single(v) => vec![v],
            Scores::Multi(v) => v,
        }
    }
}

impl From<f64> for Scores {
    fn from(v: f64) -> Self {
        Scores::Single(v)
    }
}

impl From<Vec<f64>> for Scores {
    fn from(v: Vec<f64>) -> Self {
        Scores::Multi(v)
    }
}

impl<const N: usize> From<[f64; N]> for Scores {
    fn from(v: [f64; N]) -> Self {
        Scores::Multi(v.to_vec())
    }
}

/// Decision values bound to their parameter names.
///
/// Values can be looked up by name or read positionally in the declared
/// parameter order.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    parameters: &'a [Parameter],
    values: &'a [Value],
}

impl<'a> Arguments<'a> {
    pub fn new(parameters: &'a [Parameter], values: &'a [Value]) -> Self {
        debug_assert_eq!(parameters.len(), values.len());
        Self { parameters, values }
    }

    /// Value bound to `name`, if such a parameter exists.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.parameters
            .iter()
            .position(|p| p.name() == name)
            .map(|i| self.values[i])
    }

    /// Numeric value bound to `name`.
    ///
    /// # Panics
    /// Panics if no parameter is called `name`; a fitness function asking
    /// for an undeclared parameter is a programming error.
    pub fn f64(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(v) => v.as_f64(),
            None => panic!("no parameter named `{name}`"),
        }
    }

    /// Values in declared parameter order.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// `(name, value)` pairs in declared parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Value)> + '_ {
        self.parameters
            .iter()
            .zip(self.values.iter())
            .map(|(p, &v)| (p.name(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A black-box function scored by the optimizer.
///
/// Closures `Fn(&Arguments) -> S` with `S: Into<Scores>` implement this
/// trait directly. Use [`fallible`] for closures that can fail, and
/// [`ObjectiveList`] to combine independent single-objective functions.
///
/// Evaluation may block on arbitrary external work (a simulator run, a
/// network call); the engine imposes no timeout.
pub trait FitnessFunction {
    /// Error raised by the function; surfaced as [`NsgaError::Evaluation`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the raw (unweighted) scores for one set of arguments.
    fn evaluate(&self, args: &Arguments<'_>) -> Result<Scores, Self::Error>;
}

impl<F, S> FitnessFunction for F
where
    F: Fn(&Arguments<'_>) -> S,
    S: Into<Scores>,
{
    type Error = Infallible;

    fn evaluate(&self, args: &Arguments<'_>) -> Result<Scores, Infallible> {
        Ok(self(args).into())
    }
}

/// Adapter for fitness closures that return a `Result`.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(F);

/// Wraps a fallible closure as a [`FitnessFunction`].
///
/// ```
/// use u_nsga::nsga::{fallible, Arguments};
///
/// let f = fallible(|args: &Arguments<'_>| -> Result<f64, std::io::Error> {
///     Ok(args.f64("x") * 2.0)
/// });
/// # let _ = f;
/// ```
pub fn fallible<F, S, E>(f: F) -> Fallible<F>
where
    F: Fn(&Arguments<'_>) -> Result<S, E>,
    S: Into<Scores>,
    E: std::error::Error + Send + Sync + 'static,
{
    Fallible(f)
}

impl<F, S, E> FitnessFunction for Fallible<F>
where
    F: Fn(&Arguments<'_>) -> Result<S, E>,
    S: Into<Scores>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn evaluate(&self, args: &Arguments<'_>) -> Result<Scores, E> {
        (self.0)(args).map(Into::into)
    }
}

type Objective<'f> = Box<dyn Fn(&Arguments<'_>) -> f64 + 'f>;

/// Independent scalar objectives, evaluated in registration order.
#[derive(Default)]
pub struct ObjectiveList<'f> {
    objectives: Vec<Objective<'f>>,
}

impl<'f> ObjectiveList<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an objective; its score lands in the next objective slot.
    pub fn with(mut self, objective: impl Fn(&Arguments<'_>) -> f64 + 'f) -> Self {
        self.objectives.push(Box::new(objective));
        self
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }
}

impl FitnessFunction for ObjectiveList<'_> {
    type Error = Infallible;

    fn evaluate(&self, args: &Arguments<'_>) -> Result<Scores, Infallible> {
        Ok(Scores::Multi(self.objectives.iter().map(|f| f(args)).collect()))
    }
}

/// A candidate solution.
///
/// `objectives` holds **weighted** scores (raw score times its signed
/// weight), so larger is always better. An empty `objectives` vector means
/// the individual has no valid scores and must be evaluated before it is
/// ranked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Pareto rank, `None` while unranked. Lower is better.
    pub rank: Option<usize>,

    /// Crowding distance; larger means a less crowded neighbourhood.
    pub crowding_distance: f64,

    /// Weighted objective scores.
    pub objectives: Vec<f64>,

    /// Decision values, in parameter order.
    pub genes: Vec<Value>,
}

impl Individual {
    /// An unranked, unevaluated individual holding `genes`.
    pub fn new(genes: Vec<Value>) -> Self {
        Self {
            rank: None,
            crowding_distance: 0.0,
            objectives: Vec::new(),
            genes,
        }
    }

    /// Draws one fresh value per parameter.
    pub fn sample<R: Rng>(parameters: &[Parameter], rng: &mut R) -> Self {
        Self::new(parameters.iter().map(|p| p.sample(rng)).collect())
    }

    /// Whether the cached objective scores are usable.
    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Drops cached scores, rank and distance after the genes changed.
    pub fn invalidate(&mut self) {
        self.rank = None;
        self.crowding_distance = 0.0;
        self.objectives.clear();
    }

    /// Genes bound to the parameter names.
    pub fn arguments<'a>(&'a self, parameters: &'a [Parameter]) -> Arguments<'a> {
        Arguments::new(parameters, &self.genes)
    }

    /// Scores the individual and stores the weighted results.
    ///
    /// Each raw score is multiplied by the weight at the same position.
    /// Only `objectives` is written; rank, distance and genes are left as
    /// they were.
    ///
    /// # Errors
    /// - [`NsgaError::ObjectiveArityMismatch`] if the function returns a
    ///   different number of scores than there are weights.
    /// - [`NsgaError::NonFiniteScore`] if a score is NaN or infinite, or
    ///   overflows once weighted. The individual stays unevaluated.
    /// - [`NsgaError::Evaluation`] if the function itself fails.
    pub fn evaluate<F: FitnessFunction>(
        &mut self,
        parameters: &[Parameter],
        fitness: &F,
        weights: &[f64],
    ) -> Result<(), NsgaError> {
        let scores = fitness
            .evaluate(&self.arguments(parameters))
            .map_err(NsgaError::evaluation)?;

        if scores.len() != weights.len() {
            return Err(NsgaError::ObjectiveArityMismatch {
                expected: weights.len(),
                actual: scores.len(),
            });
        }

        let weighted = scores
            .into_vec()
            .into_iter()
            .zip(weights)
            .enumerate()
            .map(|(objective, (s, w))| {
                let score = s * w;
                if score.is_finite() {
                    Ok(score)
                } else {
                    Err(NsgaError::NonFiniteScore { objective, value: s })
                }
            })
            .collect::<Result<Vec<f64>, NsgaError>>()?;

        self.objectives = weighted;
        Ok(())
    }

    /// Raw objective scores, undoing the weighting.
    pub fn raw_objectives(&self, weights: &[f64]) -> Vec<f64> {
        self.objectives
            .iter()
            .zip(weights)
            .map(|(s, w)| s / w)
            .collect()
    }
}
