//! Decision parameters.
//!
//! A [`Parameter`] names one decision variable and describes its
//! [`Domain`]: an inclusive integer range, a continuous float range, or a
//! float range quantized on a fixed step grid. Parameters know how to draw
//! a uniform sample and how to repair an out-of-domain value.
//!
//! The engine only ever produces genes through [`Parameter::sample`], so
//! its genes are always legal. [`Parameter::repair`] is for callers that
//! build values themselves, such as decoding stored designs or turning a
//! simulator's suggested settings back into genes.

use crate::error::NsgaError;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

/// The value held by one decision slot of an individual.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Numeric view of the value, for fitness functions that only
    /// care about magnitudes.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    /// Returns the integer payload, if this is an integer slot.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(v),
            Value::Float(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The set of values a parameter may take. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// Every integer in `[min, max]`.
    Integer { min: i64, max: i64 },

    /// Reals in `[min, max]`; with `step`, only `min + k * step`.
    Float {
        min: f64,
        max: f64,
        step: Option<f64>,
    },
}

/// Slack used when counting grid points, so that `(max - min) / step`
/// landing a hair under an integer still reaches the last grid point.
const GRID_EPSILON: f64 = 1e-9;

/// Most grid steps a stepped parameter may span; beyond 2^53 grid indices
/// stop being exact in `f64`.
const MAX_GRID_STEPS: f64 = (1u64 << 53) as f64;

/// A named decision variable.
///
/// # Examples
///
/// ```
/// use u_nsga::nsga::{Parameter, Value};
/// use u_nsga::random::create_rng;
///
/// let glazing = Parameter::stepped("glazing_ratio", 0.1, 0.9, 0.2).unwrap();
/// let mut rng = create_rng(42);
/// let v = glazing.sample(&mut rng).as_f64();
/// assert!((0.1..=0.9).contains(&v));
///
/// let floors = Parameter::integer("floors", 1, 4).unwrap();
/// assert_eq!(floors.repair(Value::Float(7.6)), Value::Int(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    name: String,
    domain: Domain,
}

impl Parameter {
    /// Integer parameter over `[min, max]`.
    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> Result<Self, NsgaError> {
        let name = name.into();
        if min > max {
            return Err(NsgaError::invalid_domain(
                &name,
                format!("min {min} is greater than max {max}"),
            ));
        }
        Ok(Self {
            name,
            domain: Domain::Integer { min, max },
        })
    }

    /// Continuous float parameter over `[min, max]`.
    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Result<Self, NsgaError> {
        let name = name.into();
        check_float_bounds(&name, min, max)?;
        Ok(Self {
            name,
            domain: Domain::Float {
                min,
                max,
                step: None,
            },
        })
    }

    /// Float parameter restricted to the grid `min + k * step`.
    ///
    /// Fails with [`NsgaError::InvalidDomain`] if `step` is not a positive
    /// finite number, or if the range holds more than 2^53 steps.
    pub fn stepped(
        name: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
    ) -> Result<Self, NsgaError> {
        let name = name.into();
        check_float_bounds(&name, min, max)?;
        if !step.is_finite() || step <= 0.0 {
            return Err(NsgaError::invalid_domain(
                &name,
                format!("step must be positive, got {step}"),
            ));
        }
        if (max - min) / step > MAX_GRID_STEPS {
            return Err(NsgaError::invalid_domain(
                &name,
                format!("step {step} is too fine for [{min}, {max}]"),
            ));
        }
        Ok(Self {
            name,
            domain: Domain::Float {
                min,
                max,
                step: Some(step),
            },
        })
    }

    /// Builds a parameter from a `(min, max, step)` descriptor.
    ///
    /// `step == 0` selects an integer parameter whose bounds are the
    /// integers inside `[min, max]`; any other step is a quantized float.
    pub fn from_bounds(
        name: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
    ) -> Result<Self, NsgaError> {
        let name = name.into();
        if step != 0.0 {
            return Self::stepped(name, min, max, step);
        }
        check_float_bounds(&name, min, max)?;
        let (lo, hi) = (min.ceil(), max.floor());
        if lo > hi {
            return Err(NsgaError::invalid_domain(
                &name,
                format!("no integer lies in [{min}, {max}]"),
            ));
        }
        if lo < i64::MIN as f64 || hi > i64::MAX as f64 {
            return Err(NsgaError::invalid_domain(
                &name,
                "bounds exceed the integer range",
            ));
        }
        Self::integer(name, lo as i64, hi as i64)
    }

    /// The parameter's name, unique within its set.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Draws a uniformly distributed value from the domain.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        match self.domain {
            Domain::Integer { min, max } => Value::Int(rng.random_range(min..=max)),
            Domain::Float {
                min,
                max,
                step: None,
            } => {
                if min == max {
                    Value::Float(min)
                } else {
                    Value::Float(rng.random_range(min..=max))
                }
            }
            Domain::Float {
                min,
                max,
                step: Some(step),
            } => {
                let k = rng.random_range(0..=grid_points(min, max, step));
                Value::Float(grid_value(min, max, step, k))
            }
        }
    }

    /// Whether `value` is a legal value of this parameter.
    ///
    /// Grid membership for stepped parameters is not checked; only the
    /// bounds and the integer/float kind are.
    pub fn contains(&self, value: Value) -> bool {
        match (&self.domain, value) {
            (Domain::Integer { min, max }, Value::Int(v)) => (*min..=*max).contains(&v),
            (Domain::Float { min, max, .. }, Value::Float(v)) => v >= *min && v <= *max,
            _ => false,
        }
    }

    /// Maps an arbitrary value onto the nearest legal value.
    ///
    /// Not called by the evolution loop; see the module docs.
    ///
    /// Integers are rounded, stepped floats snap to the closest grid point,
    /// and everything is clamped into `[min, max]`.
    pub fn repair(&self, value: Value) -> Value {
        let v = value.as_f64();
        match self.domain {
            Domain::Integer { min, max } => {
                let v = if v.is_nan() { min as f64 } else { v.round() };
                Value::Int((v.clamp(min as f64, max as f64)) as i64)
            }
            Domain::Float {
                min,
                max,
                step: None,
            } => {
                if v.is_nan() {
                    Value::Float(min)
                } else {
                    Value::Float(v.clamp(min, max))
                }
            }
            Domain::Float {
                min,
                max,
                step: Some(step),
            } => {
                let last = grid_points(min, max, step);
                let k = if v.is_nan() {
                    0
                } else {
                    ((v - min) / step).round().clamp(0.0, last as f64) as u64
                };
                Value::Float(grid_value(min, max, step, k))
            }
        }
    }
}

fn check_float_bounds(name: &str, min: f64, max: f64) -> Result<(), NsgaError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(NsgaError::invalid_domain(
            name,
            format!("bounds must be finite, got [{min}, {max}]"),
        ));
    }
    if min > max {
        return Err(NsgaError::invalid_domain(
            name,
            format!("min {min} is greater than max {max}"),
        ));
    }
    if !(max - min).is_finite() {
        return Err(NsgaError::invalid_domain(
            name,
            format!("width of [{min}, {max}] overflows"),
        ));
    }
    Ok(())
}

/// Largest `k` with `min + k * step <= max`.
///
/// Construction bounds the quotient by [`MAX_GRID_STEPS`], so the cast is
/// exact.
fn grid_points(min: f64, max: f64, step: f64) -> u64 {
    ((max - min) / step + GRID_EPSILON).floor() as u64
}

fn grid_value(min: f64, max: f64, step: f64, k: u64) -> f64 {
    (min + k as f64 * step).min(max)
}

/// Rejects parameter sets containing the same name twice.
pub fn check_unique_names(parameters: &[Parameter]) -> Result<(), NsgaError> {
    let mut seen = HashSet::with_capacity(parameters.len());
    for p in parameters {
        if !seen.insert(p.name()) {
            return Err(NsgaError::DuplicateParameter {
                name: p.name().to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    // ---- Construction ----

    #[test]
    fn test_integer_rejects_inverted_bounds() {
        let err = Parameter::integer("n", 5, 1).unwrap_err();
        assert!(matches!(err, NsgaError::InvalidDomain { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_float_rejects_inverted_and_nan_bounds() {
        assert!(Parameter::float("x", 1.0, 0.0).is_err());
        assert!(Parameter::float("x", f64::NAN, 1.0).is_err());
        assert!(Parameter::float("x", 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_stepped_rejects_bad_step() {
        assert!(Parameter::stepped("x", 0.0, 1.0, 0.0).is_err());
        assert!(Parameter::stepped("x", 0.0, 1.0, -0.1).is_err());
        assert!(Parameter::stepped("x", 0.0, 1.0, f64::NAN).is_err());
        assert!(Parameter::stepped("x", 0.0, 1.0, 0.25).is_ok());
    }

    #[test]
    fn test_float_rejects_overflowing_width() {
        let err = Parameter::float("x", -f64::MAX, f64::MAX).unwrap_err();
        assert!(matches!(err, NsgaError::InvalidDomain { ref name, .. } if name == "x"));
        assert!(Parameter::stepped("x", -f64::MAX, f64::MAX, 1.0).is_err());
        assert!(Parameter::from_bounds("x", -f64::MAX, f64::MAX, 0.0).is_err());

        // half the range still fits
        let p = Parameter::float("x", 0.0, f64::MAX).unwrap();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            assert!(p.contains(p.sample(&mut rng)));
        }
    }

    #[test]
    fn test_stepped_rejects_too_many_grid_points() {
        assert!(Parameter::stepped("x", 0.0, 1e300, 1.0).is_err());
        assert!(Parameter::stepped("x", 0.0, 1.0, 1e-300).is_err());

        // 2^53 steps is the largest grid accepted
        let max = (1u64 << 53) as f64;
        let p = Parameter::stepped("x", 0.0, max, 1.0).unwrap();
        let mut rng = create_rng(9);
        for _ in 0..200 {
            let v = p.sample(&mut rng).as_f64();
            assert!((0.0..=max).contains(&v));
            assert_eq!(v, v.round(), "{v} is off the grid");
        }
    }

    #[test]
    fn test_from_bounds_zero_step_is_integer() {
        let p = Parameter::from_bounds("n", 0.5, 3.7, 0.0).unwrap();
        assert_eq!(p.domain(), &Domain::Integer { min: 1, max: 3 });
    }

    #[test]
    fn test_from_bounds_nonzero_step_is_stepped() {
        let p = Parameter::from_bounds("x", 0.0, 1.0, 0.5).unwrap();
        assert_eq!(
            p.domain(),
            &Domain::Float {
                min: 0.0,
                max: 1.0,
                step: Some(0.5)
            }
        );
        assert!(Parameter::from_bounds("x", 0.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn test_from_bounds_without_integer_inside() {
        assert!(Parameter::from_bounds("n", 0.2, 0.8, 0.0).is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let params = vec![
            Parameter::integer("a", 0, 1).unwrap(),
            Parameter::float("b", 0.0, 1.0).unwrap(),
            Parameter::integer("a", 2, 3).unwrap(),
        ];
        let err = check_unique_names(&params).unwrap_err();
        assert!(matches!(err, NsgaError::DuplicateParameter { ref name } if name == "a"));
        assert!(check_unique_names(&params[..2]).is_ok());
    }

    // ---- Sampling ----

    #[test]
    fn test_integer_samples_cover_bounds() {
        let p = Parameter::integer("n", -2, 2).unwrap();
        let mut rng = create_rng(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = p.sample(&mut rng).as_i64().expect("integer slot");
            assert!((-2..=2).contains(&v));
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "not all values drawn: {seen:?}");
    }

    #[test]
    fn test_float_samples_within_bounds() {
        let p = Parameter::float("x", -10.0, 10.0).unwrap();
        let mut rng = create_rng(7);
        for _ in 0..1000 {
            let v = p.sample(&mut rng);
            assert!(p.contains(v), "{v} out of domain");
        }
    }

    #[test]
    fn test_degenerate_float_range() {
        let p = Parameter::float("x", 3.0, 3.0).unwrap();
        let mut rng = create_rng(1);
        assert_eq!(p.sample(&mut rng), Value::Float(3.0));
    }

    #[test]
    fn test_stepped_samples_on_grid() {
        let p = Parameter::stepped("x", 1.0, 2.0, 0.3).unwrap();
        let mut rng = create_rng(3);
        let mut max_seen = f64::MIN;
        for _ in 0..500 {
            let v = p.sample(&mut rng).as_f64();
            assert!((1.0..=2.0).contains(&v));
            let k = (v - 1.0) / 0.3;
            assert!((k - k.round()).abs() < 1e-9, "{v} is off the grid");
            max_seen = max_seen.max(v);
        }
        // 1.0 + 3 * 0.3 is the last grid point not exceeding 2.0
        assert!((max_seen - 1.9).abs() < 1e-9, "max seen {max_seen}");
    }

    #[test]
    fn test_stepped_reaches_exact_max() {
        let p = Parameter::stepped("x", 0.0, 1.0, 0.1).unwrap();
        let mut rng = create_rng(11);
        let hit_max = (0..2000).any(|_| (p.sample(&mut rng).as_f64() - 1.0).abs() < 1e-12);
        assert!(hit_max, "grid point 1.0 never sampled");
    }

    #[test]
    fn test_step_larger_than_range() {
        let p = Parameter::stepped("x", 0.0, 1.0, 5.0).unwrap();
        let mut rng = create_rng(3);
        for _ in 0..20 {
            assert_eq!(p.sample(&mut rng), Value::Float(0.0));
        }
    }

    // ---- Repair ----

    #[test]
    fn test_repair_clamps_and_snaps() {
        let i = Parameter::integer("n", 0, 10).unwrap();
        assert_eq!(i.repair(Value::Int(-3)), Value::Int(0));
        assert_eq!(i.repair(Value::Float(4.4)), Value::Int(4));

        let f = Parameter::float("x", 0.0, 1.0).unwrap();
        assert_eq!(f.repair(Value::Float(1.5)), Value::Float(1.0));
        assert_eq!(f.repair(Value::Int(0)), Value::Float(0.0));

        let s = Parameter::stepped("x", 0.0, 1.0, 0.25).unwrap();
        assert_eq!(s.repair(Value::Float(0.3)), Value::Float(0.25));
        assert_eq!(s.repair(Value::Float(9.0)), Value::Float(1.0));
    }

    #[test]
    fn test_contains_checks_kind() {
        let i = Parameter::integer("n", 0, 10).unwrap();
        assert!(i.contains(Value::Int(3)));
        assert!(!i.contains(Value::Float(3.0)));
        assert!(!i.contains(Value::Int(11)));
    }
}
