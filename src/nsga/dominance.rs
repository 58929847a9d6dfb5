//! Pareto ranking: dominance, fast non-dominated sorting and crowding
//! distance.
//!
//! All objectives are **maximized**: callers fold the optimization
//! direction into signed weights before scores reach this module.
//!
//! # Algorithms
//!
//! - [`dominates`]: non-strict Pareto dominance
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: crowding distance for diversity preservation
//! - [`crowded_cmp`]: the rank-then-distance order used for truncation
//!   and tournaments
//! - [`rank_population`]: all of the above applied to a population
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::config::CrowdingScope;
use super::individual::Individual;
use std::cmp::Ordering;

/// Crowding distance given to boundary solutions of every objective.
pub const BOUNDARY_DISTANCE: f64 = f64::INFINITY;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Non-strict Pareto dominance.
///
/// `a` dominates `b` iff `a` is at least as good as `b` on **every**
/// objective (`a[m] >= b[m]`). No strict improvement is required, so two
/// identical score vectors dominate each other.
///
/// ```
/// use u_nsga::nsga::dominance::dominates;
///
/// assert!(dominates(&[2.0, 3.0], &[1.0, 3.0]));
/// assert!(!dominates(&[2.0, 1.0], &[1.0, 3.0]));
/// // ties dominate both ways
/// assert!(dominates(&[1.0, 1.0], &[1.0, 1.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");
    a.iter().zip(b).all(|(va, vb)| va >= vb)
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on [`dominates`].
///
/// A pair where each side dominates the other (identical scores) is
/// treated as mutually non-dominating here: counting both directions would
/// leave each member of the pair waiting on the other forever, and neither
/// would ever be ranked. With that rule every solution receives a rank and
/// ranks are contiguous from 0.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each solution `p`, collect the set `S(p)` it dominates and the
///    count `n(p)` of solutions dominating it
/// 2. Solutions with `n(p) == 0` form front 0
/// 3. For each member of the current front, decrement `n` of everything it
///    dominates; solutions reaching 0 form the next front
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_nsga::nsga::dominance::non_dominated_sort;
///
/// // maximize both objectives
/// let objectives = vec![
///     vec![5.0, 1.0],  // A
///     vec![3.0, 3.0],  // B
///     vec![1.0, 5.0],  // C
///     vec![2.0, 2.0],  // D, dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts.len(), 2);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    // Compute dominance relationships
    for i in 0..n {
        for j in (i + 1)..n {
            let i_over_j = dominates(&objectives[i], &objectives[j]);
            let j_over_i = dominates(&objectives[j], &objectives[i]);
            match (i_over_j, j_over_i) {
                (true, false) => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                (false, true) => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                // mutual (tie) or incomparable
                _ => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    // Peel fronts until no dominated individual is left
    let mut fronts = vec![front_0];
    let mut level = 0;
    loop {
        let mut next_front = Vec::new();

        for &i in &fronts[level] {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
        level += 1;
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive
/// [`BOUNDARY_DISTANCE`]. An objective on which every solution scores the
/// same contributes nothing to interior solutions.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value
/// 2. Assign the boundary distance to the first and last solution
/// 3. For interior solutions, add `(next - prev) / (max - min)`
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_nsga::nsga::dominance::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![BOUNDARY_DISTANCE; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| objectives[a][obj_idx].total_cmp(&objectives[b][obj_idx]));

        distances[indices[0]] = BOUNDARY_DISTANCE;
        distances[indices[n - 1]] = BOUNDARY_DISTANCE;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 && range.is_finite() {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Crowded-comparison order: rank ascending (unranked last), then
/// crowding distance descending.
///
/// `Ordering::Less` means `a` is the better individual.
pub fn crowded_cmp(a: &Individual, b: &Individual) -> Ordering {
    let rank_a = a.rank.unwrap_or(usize::MAX);
    let rank_b = b.rank.unwrap_or(usize::MAX);
    rank_a
        .cmp(&rank_b)
        .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
}

/// Ranks a population in place.
///
/// Writes every individual's `rank` and `crowding_distance`, then reorders
/// the population front-major (all of front 0, then front 1, ...; order
/// within a front follows the original order). Returns the number of
/// fronts.
///
/// # Panics
/// Panics if any individual lacks objective scores.
pub fn rank_population(population: &mut Vec<Individual>, scope: CrowdingScope) -> usize {
    assert!(
        population.iter().all(Individual::is_evaluated),
        "every individual must be evaluated before ranking"
    );
    if population.is_empty() {
        return 0;
    }

    let objectives: Vec<Vec<f64>> = population.iter().map(|i| i.objectives.clone()).collect();
    let sorted = non_dominated_sort(&objectives);

    for (ind, &rank) in population.iter_mut().zip(&sorted.ranks) {
        ind.rank = Some(rank);
    }

    match scope {
        CrowdingScope::Population => {
            let distances = crowding_distance(&objectives);
            for (ind, d) in population.iter_mut().zip(distances) {
                ind.crowding_distance = d;
            }
        }
        CrowdingScope::PerFront => {
            for front in &sorted.fronts {
                let front_objs: Vec<Vec<f64>> =
                    front.iter().map(|&i| objectives[i].clone()).collect();
                for (&i, d) in front.iter().zip(crowding_distance(&front_objs)) {
                    population[i].crowding_distance = d;
                }
            }
        }
    }

    let mut slots: Vec<Option<Individual>> = population.drain(..).map(Some).collect();
    for front in &sorted.fronts {
        for &i in front {
            if let Some(ind) = slots[i].take() {
                population.push(ind);
            }
        }
    }

    sorted.fronts.len()
}

/// Sorts by [`crowded_cmp`] and keeps the best `size` individuals.
///
/// The sort is stable, so equally ranked individuals with equal distance
/// keep their relative order.
pub fn truncate(population: &mut Vec<Individual>, size: usize) {
    population.sort_by(crowded_cmp);
    population.truncate(size);
}

// ============================================================================
// Tests
// ============================================================================
