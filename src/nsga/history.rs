//! Per-generation record of an optimization run.
//!
//! The runner appends one [`Generation`] after every replacement step.
//! Entries are deep copies of the surviving population and are never
//! modified afterwards; [`History`] only exposes read access.

use super::individual::Individual;

/// Summary of one generation's population.
///
/// Objective statistics are over **weighted** scores, so `best` is the
/// per-objective maximum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Number of Pareto fronts in the merged parent+offspring pool.
    pub fronts: usize,

    /// Number of rank-0 individuals that survived truncation.
    pub front_size: usize,

    /// Per-objective maximum weighted score.
    pub best: Vec<f64>,

    /// Per-objective mean weighted score.
    pub mean: Vec<f64>,
}

impl GenerationStats {
    pub(crate) fn from_population(population: &[Individual], fronts: usize) -> Self {
        let m = population.first().map_or(0, |i| i.objectives.len());
        debug_assert!(
            population.iter().all(|i| i.objectives.len() == m),
            "all individuals must have the same number of objectives"
        );
        let mut best = vec![f64::NEG_INFINITY; m];
        let mut sum = vec![0.0; m];

        for ind in population {
            for (k, &score) in ind.objectives.iter().enumerate().take(m) {
                best[k] = best[k].max(score);
                sum[k] += score;
            }
        }

        let n = population.len().max(1) as f64;
        Self {
            fronts,
            front_size: population.iter().filter(|i| i.rank == Some(0)).count(),
            best,
            mean: sum.into_iter().map(|s| s / n).collect(),
        }
    }
}

/// A snapshot taken at the end of one generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generation {
    /// 1-based generation number.
    pub index: usize,

    /// The population after truncation, best first.
    pub population: Vec<Individual>,

    pub stats: GenerationStats,
}

impl Generation {
    /// Rank-0 members of the snapshot.
    pub fn pareto_front(&self) -> impl Iterator<Item = &Individual> {
        self.population.iter().filter(|i| i.rank == Some(0))
    }
}

/// Append-only sequence of generation snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    generations: Vec<Generation>,
}

impl History {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            generations: Vec::with_capacity(n),
        }
    }

    /// Records a copy of `population`.
    pub(crate) fn record(&mut self, population: &[Individual], fronts: usize) -> &Generation {
        let generation = Generation {
            index: self.generations.len() + 1,
            stats: GenerationStats::from_population(population, fronts),
            population: population.to_vec(),
        };
        self.generations.push(generation);
        &self.generations[self.generations.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Generation> {
        self.generations.get(index)
    }

    pub fn last(&self) -> Option<&Generation> {
        self.generations.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Generation> {
        self.generations.iter()
    }

    pub fn as_slice(&self) -> &[Generation] {
        &self.generations
    }

    /// Per-generation maximum of one weighted objective.
    pub fn best_trace(&self, objective: usize) -> Vec<f64> {
        self.generations
            .iter()
            .filter_map(|g| g.stats.best.get(objective).copied())
            .collect()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Generation;
    type IntoIter = std::slice::Iter<'a, Generation>;

    fn into_iter(self) -> Self::IntoIter {
        self.generations.iter()
    }
}
