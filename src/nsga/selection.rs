//! Parent selection.
//!
//! Selection fills the parent pool the variation step draws from. Every
//! strategy compares individuals with the crowded-comparison order
//! (rank first, crowding distance second) and returns independent copies.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"

use super::dominance::crowded_cmp;
use super::individual::Individual;
use rand::Rng;

/// Selection strategy for filling the parent pool.
///
/// # Examples
///
/// ```
/// use u_nsga::nsga::Selection;
///
/// // Tournaments of 5 competitors
/// let sel = Selection::Tournament(5);
///
/// // Keep the best individuals outright
/// let sel = Selection::Truncation;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: draw `size` individuals with replacement and
    /// keep **all** of them, best first.
    ///
    /// Each round contributes `size` candidates, so `k` rounds yield a pool
    /// of `k * size` parents ordered tournament by tournament.
    ///
    /// # Complexity
    /// O(size log size) per round
    Tournament(usize),

    /// Truncation selection: the best `k` individuals by crowded
    /// comparison.
    ///
    /// # Complexity
    /// O(n log n) per generation
    Truncation,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(5)
    }
}

impl Selection {
    /// Selects a parent pool using `rounds` tournaments (or `rounds`
    /// survivors for truncation).
    ///
    /// Returns an empty pool for an empty population.
    pub fn select<R: Rng>(
        &self,
        population: &[Individual],
        rounds: usize,
        rng: &mut R,
    ) -> Vec<Individual> {
        if population.is_empty() {
            return Vec::new();
        }

        match self {
            Selection::Tournament(size) => tournament(population, *size, rounds, rng),
            Selection::Truncation => truncation(population, rounds),
        }
    }
}

/// `rounds` tournaments of `size` competitors, every competitor kept.
fn tournament<R: Rng>(
    population: &[Individual],
    size: usize,
    rounds: usize,
    rng: &mut R,
) -> Vec<Individual> {
    let size = size.max(1);
    let n = population.len();

    let mut chosen = Vec::with_capacity(rounds * size);
    for _ in 0..rounds {
        let mut aspirants: Vec<&Individual> =
            (0..size).map(|_| &population[rng.random_range(0..n)]).collect();
        aspirants.sort_by(|a, b| crowded_cmp(a, b));
        chosen.extend(aspirants.into_iter().cloned());
    }
    chosen
}

/// The best `k` individuals.
fn truncation(population: &[Individual], k: usize) -> Vec<Individual> {
    let mut sorted: Vec<&Individual> = population.iter().collect();
    sorted.sort_by(|a, b| crowded_cmp(a, b));
    sorted.into_iter().take(k).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nsga::param::Value;
    use crate::random::create_rng;

    fn ranked(id: i64, rank: usize, distance: f64) -> Individual {
        let mut ind = Individual::new(vec![Value::Int(id)]);
        ind.objectives = vec![0.0];
        ind.rank = Some(rank);
        ind.crowding_distance = distance;
        ind
    }

    fn id(ind: &Individual) -> i64 {
        ind.genes[0].as_i64().unwrap()
    }

    fn make_population() -> Vec<Individual> {
        vec![
            ranked(0, 2, 1.0),
            ranked(1, 0, 0.5),
            ranked(2, 0, f64::INFINITY),
            ranked(3, 1, 3.0),
        ]
    }

    #[test]
    fn test_tournament_pool_size() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let pool = Selection::Tournament(3).select(&pop, 5, &mut rng);
        assert_eq!(pool.len(), 15);
    }

    #[test]
    fn test_tournament_rounds_sorted_best_first() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let pool = Selection::Tournament(4).select(&pop, 50, &mut rng);

        for round in pool.chunks(4) {
            for pair in round.windows(2) {
                assert_ne!(
                    crowded_cmp(&pair[0], &pair[1]),
                    std::cmp::Ordering::Greater,
                    "round not sorted: {:?}",
                    round.iter().map(id).collect::<Vec<_>>()
                );
            }
        }
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let mut leaders = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            let pool = Selection::Tournament(4).select(&pop, 1, &mut rng);
            leaders[id(&pool[0]) as usize] += 1;
        }
        // Individual 2 (rank 0, boundary) should lead most tournaments:
        // it is drawn at least once in 1 - (3/4)^4 ≈ 68% of them.
        assert!(
            leaders[2] > 6000,
            "expected best to lead >60% of tournaments, got {leaders:?}"
        );
        // The worst leads only when drawn all four times (1/256)
        assert!(leaders[0] < 200, "worst led too often: {leaders:?}");
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for ind in Selection::Tournament(1).select(&pop, 10_000, &mut rng) {
            counts[id(&ind) as usize] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_selection_returns_copies() {
        let pop = make_population();
        let mut rng = create_rng(1);
        let mut pool = Selection::Tournament(2).select(&pop, 3, &mut rng);
        pool[0].genes[0] = Value::Int(99);
        assert!(pop.iter().all(|i| id(i) != 99));
    }

    #[test]
    fn test_truncation_keeps_best() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let pool = Selection::Truncation.select(&pop, 3, &mut rng);
        let ids: Vec<i64> = pool.iter().map(id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_truncation_more_rounds_than_population() {
        let pop = make_population();
        let mut rng = create_rng(42);
        let pool = Selection::Truncation.select(&pop, 10, &mut rng);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_empty_population() {
        let pop: Vec<Individual> = vec![];
        let mut rng = create_rng(42);
        assert!(Selection::Tournament(3).select(&pop, 5, &mut rng).is_empty());
        assert!(Selection::Truncation.select(&pop, 5, &mut rng).is_empty());
    }
}
