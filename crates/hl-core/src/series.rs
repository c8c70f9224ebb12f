//! Exogenous time series.
//!
//! A series is either one constant or a list of per-step values. Indexing is
//! cyclic and signed: step `-1` is the last value, so run-up steps placed
//! before step 0 read the end of the series and wrap into its start.

use crate::error::{HlError, HlResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Constant(f64),
    Values(Vec<f64>),
}

impl Default for Series {
    fn default() -> Self {
        Series::Constant(0.0)
    }
}

impl From<f64> for Series {
    fn from(v: f64) -> Self {
        Series::Constant(v)
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Values(values)
    }
}

impl Series {
    /// Value at `step`, wrapping cyclically.
    #[inline]
    pub fn at(&self, step: i64) -> f64 {
        match self {
            Series::Constant(v) => *v,
            Series::Values(values) => {
                let idx = step.rem_euclid(values.len() as i64) as usize;
                values[idx]
            }
        }
    }

    /// Number of stored values; `None` for a constant.
    pub fn len(&self) -> Option<usize> {
        match self {
            Series::Constant(_) => None,
            Series::Values(values) => Some(values.len()),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Series::Constant(_))
    }

    pub fn mean(&self) -> f64 {
        match self {
            Series::Constant(v) => *v,
            Series::Values(values) => values.iter().sum::<f64>() / values.len() as f64,
        }
    }

    /// Reject empty lists and non-finite values.
    pub fn validate(&self, what: &'static str) -> HlResult<()> {
        match self {
            Series::Constant(v) if !v.is_finite() => Err(HlError::NonFinite { what, value: *v }),
            Series::Constant(_) => Ok(()),
            Series::Values(values) if values.is_empty() => Err(HlError::EmptySeries { what }),
            Series::Values(values) => match values.iter().find(|v| !v.is_finite()) {
                Some(bad) => Err(HlError::NonFinite { what, value: *bad }),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_indexing_wraps_both_ways() {
        let s = Series::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.at(0), 1.0);
        assert_eq!(s.at(4), 2.0);
        assert_eq!(s.at(-1), 3.0);
        assert_eq!(s.at(-4), 3.0);
    }

    #[test]
    fn constant_ignores_step() {
        let s = Series::Constant(5.0);
        assert_eq!(s.at(-100), 5.0);
        assert_eq!(s.len(), None);
        assert_eq!(s.mean(), 5.0);
    }

    #[test]
    fn validation() {
        assert!(Series::Values(vec![]).validate("empty").is_err());
        assert!(Series::Values(vec![1.0, f64::NAN]).validate("nan").is_err());
        assert!(Series::Constant(f64::INFINITY).validate("inf").is_err());
        assert!(Series::from(vec![0.0, 1.0]).validate("ok").is_ok());
    }
}
