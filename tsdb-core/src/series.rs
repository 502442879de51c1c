//! Series domain types.
//!
//! A [`Series`] is a named, dimension-fixed, insertion-ordered sequence
//! of [`Point`]s. Storage and registry bookkeeping live in `tsdb-storage`;
//! this module only carries the shapes.

use serde::{Deserialize, Serialize};

/// A single length-D vector of finite `f64` components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub values: Vec<f64>,
}

impl Point {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// All components are finite (no NaN/Inf), per the storage invariant.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Static metadata about a series: its name and fixed dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub name: String,
    pub dimension: usize,
}

/// A non-empty, printable series name.
pub fn is_valid_series_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_tracks_its_own_dimension() {
        let p = Point::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.dimension(), 3);
    }

    #[test]
    fn non_finite_components_are_detected() {
        let p = Point::new(vec![1.0, f64::NAN]);
        assert!(!p.is_finite());
        let p = Point::new(vec![1.0, f64::INFINITY]);
        assert!(!p.is_finite());
        let p = Point::new(vec![1.0, 2.0]);
        assert!(p.is_finite());
    }

    #[test]
    fn series_name_validation() {
        assert!(is_valid_series_name("btc_returns"));
        assert!(!is_valid_series_name(""));
        assert!(!is_valid_series_name("bad\nname"));
    }
}
