//! Variation operators over parameter-encoded individuals.
//!
//! Both operators follow value semantics: parents are borrowed, children
//! are fresh copies. A child whose genes changed has its cached scores,
//! rank and distance invalidated and must be re-evaluated; a child that
//! came through unchanged keeps them.
//!
//! - [`mutate`]: per-gene random resetting from the parameter domain
//! - [`crossover`]: one-point crossover exchanging gene suffixes
//! - [`two_point_crossover`]: exchanges one inner gene segment
//!
//! [`Crossover`] picks between the two crossovers at run time.

use super::individual::Individual;
use super::param::Parameter;
use rand::Rng;

/// Crossover operator used by the evolution loop.
///
/// # Examples
///
/// ```
/// use u_nsga::nsga::{Crossover, NsgaConfig};
///
/// let config = NsgaConfig::default().with_crossover(Crossover::TwoPoint);
/// assert_eq!(config.crossover, Crossover::TwoPoint);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Exchange the gene suffixes after one cut. See [`crossover`].
    #[default]
    OnePoint,

    /// Exchange the gene segment between two cuts. See
    /// [`two_point_crossover`].
    TwoPoint,
}

impl Crossover {
    /// Applies the operator to a pair of parents.
    pub fn apply<R: Rng>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        probability: f64,
        rng: &mut R,
    ) -> (Individual, Individual) {
        match self {
            Crossover::OnePoint => crossover(parent1, parent2, probability, rng),
            Crossover::TwoPoint => two_point_crossover(parent1, parent2, probability, rng),
        }
    }
}

/// Random-resetting mutation.
///
/// Each gene independently, with `probability`, is replaced by a fresh
/// sample of its parameter.
///
/// # Panics
/// Panics if the individual has a different number of genes than there are
/// parameters.
pub fn mutate<R: Rng>(
    individual: &Individual,
    parameters: &[Parameter],
    probability: f64,
    rng: &mut R,
) -> Individual {
    assert_eq!(
        individual.genes.len(),
        parameters.len(),
        "gene count must match parameter count"
    );

    let mut child = individual.clone();
    let mut touched = false;
    for (gene, param) in child.genes.iter_mut().zip(parameters) {
        if rng.random_bool(probability) {
            *gene = param.sample(rng);
            touched = true;
        }
    }

    if touched {
        child.invalidate();
    }
    child
}

/// One-point crossover.
///
/// With `probability`, a cut index is drawn uniformly over the gene
/// positions and the suffixes `[cut..]` of the two parents are exchanged.
/// A cut at position 0 swaps every gene, so each child is a full copy of
/// the opposite parent.
///
/// # Panics
/// Panics if the parents have different gene counts.
pub fn crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    probability: f64,
    rng: &mut R,
) -> (Individual, Individual) {
    exchange(parent1, parent2, probability, rng, |n, rng| {
        (rng.random_range(0..n), n)
    })
}

/// Two-point crossover.
///
/// With `probability`, two distinct cut points are drawn from `0..=n`
/// and the genes between them, `[lo..hi)`, are exchanged. The segment is
/// never empty and may touch either end of the gene list.
///
/// # Panics
/// Panics if the parents have different gene counts.
pub fn two_point_crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    probability: f64,
    rng: &mut R,
) -> (Individual, Individual) {
    exchange(parent1, parent2, probability, rng, |n, rng| {
        let a = rng.random_range(0..=n);
        let mut b = rng.random_range(0..n);
        if b >= a {
            b += 1;
        }
        (a.min(b), a.max(b))
    })
}

/// Copies both parents and, with `probability`, swaps the gene range
/// returned by `segment`.
fn exchange<R, S>(
    parent1: &Individual,
    parent2: &Individual,
    probability: f64,
    rng: &mut R,
    segment: S,
) -> (Individual, Individual)
where
    R: Rng,
    S: FnOnce(usize, &mut R) -> (usize, usize),
{
    let n = parent1.genes.len();
    assert_eq!(n, parent2.genes.len(), "parents must have equal length");

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    if n == 0 || !rng.random_bool(probability) {
        return (child1, child2);
    }

    let (lo, hi) = segment(n, rng);
    child1.genes[lo..hi].swap_with_slice(&mut child2.genes[lo..hi]);
    child1.invalidate();
    child2.invalidate();

    (child1, child2)
}

// ============================================================================
// Tests
// ============================================================================
