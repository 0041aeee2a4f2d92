//! Consumption classification
//!
//! Maps an average hourly consumption onto a coarse bucket using two
//! configurable thresholds.

use serde::{Deserialize, Serialize};

/// Classification thresholds in kWh per hour.
///
/// `low < high` is a configuration contract, not enforced at load time.
/// An inverted pair leaves the `Normal` band empty (every average lands in
/// `Low` or `High`), which callers get to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        // Defaults sized for the internal simulation (avg ~ 0.52 kWh/h)
        Self {
            low: 0.4,
            high: 0.8,
        }
    }
}

/// Coarse consumption bucket derived from the average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionClass {
    Low,
    Normal,
    High,
    Unknown,
}

impl ConsumptionClass {
    /// Classify an average consumption. Total over its input: an absent
    /// average is `Unknown`, values exactly on a threshold are `Normal`.
    pub fn classify(avg: Option<f64>, thresholds: &Thresholds) -> Self {
        match avg {
            None => ConsumptionClass::Unknown,
            Some(v) if v < thresholds.low => ConsumptionClass::Low,
            Some(v) if v > thresholds.high => ConsumptionClass::High,
            Some(_) => ConsumptionClass::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumptionClass::Low => "low",
            ConsumptionClass::Normal => "normal",
            ConsumptionClass::High => "high",
            ConsumptionClass::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_absent_average() {
        let t = Thresholds::default();
        assert_eq!(
            ConsumptionClass::classify(None, &t),
            ConsumptionClass::Unknown
        );
    }

    #[test]
    fn test_classify_below_low() {
        let t = Thresholds::default();
        assert_eq!(
            ConsumptionClass::classify(Some(0.39), &t),
            ConsumptionClass::Low
        );
    }

    #[test]
    fn test_classify_above_high() {
        let t = Thresholds::default();
        assert_eq!(
            ConsumptionClass::classify(Some(0.9), &t),
            ConsumptionClass::High
        );
    }

    #[test]
    fn test_classify_thresholds_are_inclusive_normal() {
        let t = Thresholds::default();
        assert_eq!(
            ConsumptionClass::classify(Some(0.4), &t),
            ConsumptionClass::Normal
        );
        assert_eq!(
            ConsumptionClass::classify(Some(0.8), &t),
            ConsumptionClass::Normal
        );
        assert_eq!(
            ConsumptionClass::classify(Some(0.52), &t),
            ConsumptionClass::Normal
        );
    }

    #[test]
    fn test_classify_custom_thresholds() {
        let t = Thresholds {
            low: 1.0,
            high: 2.0,
        };
        assert_eq!(
            ConsumptionClass::classify(Some(0.9), &t),
            ConsumptionClass::Low
        );
        assert_eq!(
            ConsumptionClass::classify(Some(2.1), &t),
            ConsumptionClass::High
        );
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&ConsumptionClass::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
