//! Probe samples
//!
//! A probe either produced a number or explicitly reported that it could not
//! measure this invocation. Missing samples are stored (so raw sequence
//! length reflects what was recorded) but never enter aggregation.

use serde::{Deserialize, Serialize};

/// A single recorded measurement.
///
/// Serialized as a JSON number, or `null` for [`Sample::Missing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Sample {
    /// A measured value in the probe's unit
    Value(f64),
    /// The probe had nothing to report for this invocation
    Missing,
}

impl Sample {
    /// The measured value, if any
    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Value(v) => Some(v),
            Sample::Missing => None,
        }
    }

    /// Whether this is the "no measurement" variant
    #[inline]
    pub fn is_missing(self) -> bool {
        matches!(self, Sample::Missing)
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Value(value)
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Sample::Missing, Sample::Value)
    }
}

impl From<Sample> for Option<f64> {
    fn from(sample: Sample) -> Self {
        sample.value()
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sample::Value(v) => write!(f, "{v:?}"),
            Sample::Missing => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Sample::Value(2.5).value(), Some(2.5));
        assert_eq!(Sample::Missing.value(), None);
        assert!(Sample::Missing.is_missing());
        assert!(!Sample::from(1.0).is_missing());
    }

    #[test]
    fn test_serializes_missing_as_null() {
        let json = serde_json::to_string(&vec![Sample::Value(1.0), Sample::Missing]).unwrap();
        assert_eq!(json, "[1.0,null]");

        let back: Vec<Sample> = serde_json::from_str("[3.0,null]").unwrap();
        assert_eq!(back, vec![Sample::Value(3.0), Sample::Missing]);
    }

    #[test]
    fn test_display_matches_csv_style() {
        assert_eq!(Sample::Value(1.0).to_string(), "1.0");
        assert_eq!(Sample::Value(0.5).to_string(), "0.5");
        assert_eq!(Sample::Missing.to_string(), "-");
    }
}
