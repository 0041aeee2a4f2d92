//! Synthetic consumption series and aggregate statistics
//!
//! The generator produces a closed-form daily curve (sine base load, evening
//! peak, seeded uniform noise) so every request sees the same data for the
//! same parameters. These are simulated values, not real meter readings.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seed used by both services. Fixed so repeated requests are reproducible.
pub const DEFAULT_SEED: u64 = 42;

/// One simulated hour of consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub day: u32,
    pub hour: u32,
    pub kwh: f64,
}

/// Consumption summed over one simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: u32,
    pub kwh: f64,
}

/// Summary statistics over the full hourly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub days: u32,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

/// Round to 3 decimals, the precision used on every wire value.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Generate hourly consumption values (kWh) for `days` days.
///
/// The curve is `0.4 + 0.2*sin(2π*hour/24)` plus a 0.6 kWh evening peak
/// (hours 18-22) and uniform noise in [-0.1, 0.1] drawn from a seeded RNG
/// advanced in (day, hour) order. Values are clamped to at least 0.1 and
/// rounded to 3 decimals. Identical (seed, days) yields identical output.
pub fn generate_hourly(seed: u64, days: u32) -> Vec<HourlyReading> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut readings = Vec::with_capacity(days as usize * 24);

    for day in 0..days {
        for hour in 0..24u32 {
            let base = 0.4 + 0.2 * (hour as f64 / 24.0 * 2.0 * std::f64::consts::PI).sin();
            let evening_peak = if (18..=22).contains(&hour) { 0.6 } else { 0.0 };
            let noise = rng.gen_range(-0.1..=0.1);
            let kwh = round3(f64::max(0.1, base + evening_peak + noise));
            readings.push(HourlyReading { day, hour, kwh });
        }
    }

    readings
}

/// Sum an hourly series into per-day totals, rounded to 3 decimals.
///
/// Days come out in ascending order regardless of input order.
pub fn to_daily(readings: &[HourlyReading]) -> Vec<DailyTotal> {
    let mut sums: BTreeMap<u32, f64> = BTreeMap::new();
    for r in readings {
        *sums.entry(r.day).or_insert(0.0) += r.kwh;
    }

    sums.into_iter()
        .map(|(day, kwh)| DailyTotal {
            day,
            kwh: round3(kwh),
        })
        .collect()
}

/// Compute average/min/max over the full hourly series.
///
/// An empty series (days < 1) is rejected rather than dividing by zero.
pub fn to_stats(days: u32, readings: &[HourlyReading]) -> Result<UsageStats> {
    if readings.is_empty() {
        return Err(Error::InvalidArgument(
            "days must be at least 1".to_string(),
        ));
    }

    let sum: f64 = readings.iter().map(|r| r.kwh).sum();
    let max = readings.iter().map(|r| r.kwh).fold(f64::MIN, f64::max);
    let min = readings.iter().map(|r| r.kwh).fold(f64::MAX, f64::min);

    Ok(UsageStats {
        days,
        avg: round3(sum / readings.len() as f64),
        max: round3(max),
        min: round3(min),
    })
}
