//! Error type shared by every fallible operation in the crate.

use std::error::Error as StdError;

/// Errors raised while configuring or running an optimization.
///
/// Degenerate sizes (`population_size == 0`, `nb_generations == 0`) are not
/// errors: the runner returns the unmodified initial sample instead.
#[derive(Debug, thiserror::Error)]
pub enum NsgaError {
    /// A parameter's bounds or step are malformed.
    #[error("InvalidDomain: parameter `{name}`: {reason}")]
    InvalidDomain { name: String, reason: String },

    /// Two parameters in the same set share a name.
    #[error("DuplicateParameter: parameter name `{name}` is used more than once")]
    DuplicateParameter { name: String },

    /// Objective weights are empty, zero or not finite.
    #[error("InvalidWeights: {reason}")]
    InvalidWeights { reason: String },

    /// A configuration value is out of range.
    #[error("InvalidConfig: {reason}")]
    InvalidConfig { reason: String },

    /// The fitness function returned the wrong number of scores.
    #[error("ObjectiveArityMismatch: expected {expected} objective scores, got {actual}")]
    ObjectiveArityMismatch { expected: usize, actual: usize },

    /// A score was NaN or infinite, before or after weighting.
    #[error("NonFiniteScore: objective {objective} scored {value}")]
    NonFiniteScore { objective: usize, value: f64 },

    /// The fitness function itself failed.
    #[error("Evaluation: {0}")]
    Evaluation(#[source] Box<dyn StdError + Send + Sync>),
}

impl NsgaError {
    pub(crate) fn invalid_domain(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_weights(reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn evaluation<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Evaluation(Box::new(source))
    }
}
