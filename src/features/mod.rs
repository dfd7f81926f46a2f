//! Feature normalization
//!
//! Maps raw, possibly malformed scalar market signals into a fixed-size
//! vector bounded in [0,1]. Normalization is a total function: malformed
//! upstream telemetry (NaN, infinities, nulls, wrong types) must never
//! crash scoring, so any unusable value is substituted with the midpoint
//! of the feature's raw range.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;


/// Number of features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 8;

/// Canonical feature ordering, shared by coefficients and artifacts
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "odds_mid",
    "odds_spread",
    "liquidity",
    "funding_8h",
    "funding_1d",
    "fgi",
    "pnl30d",
    "vol30d",
];

/// Raw-input keys as supplied by upstream signal sources, in canonical order
const RAW_KEYS: [&str; FEATURE_COUNT] = [
    "oddsMid",
    "oddsSpread",
    "liquidity",
    "funding8h",
    "funding1d",
    "fgi",
    "pnl30d",
    "vol30d",
];

/// Fixed affine ranges per feature, in canonical order. The midpoint of a
/// range doubles as the neutral default for an absent or malformed signal.
const RAW_RANGES: [(f64, f64); FEATURE_COUNT] = [
    (0.1, 0.9),         // odds_mid
    (0.0, 0.2),         // odds_spread
    (0.0, 1_000_000.0), // liquidity
    (-0.01, 0.01),      // funding_8h
    (-0.03, 0.03),      // funding_1d
    (0.0, 100.0),       // fgi
    (-1.0, 1.0),        // pnl30d
    (0.0, 2.0),         // vol30d
];

/// Normalized market signals, each strictly in [0,1].
///
/// Constructed by [`create_feature_vector`] and treated as immutable
/// thereafter; the field order matches [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub odds_mid: f64,
    pub odds_spread: f64,
    pub liquidity: f64,
    pub funding_8h: f64,
    pub funding_1d: f64,
    pub fgi: f64,
    pub pnl30d: f64,
    pub vol30d: f64,
}

impl FeatureVector {
    /// Values in canonical [`FEATURE_NAMES`] order
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.odds_mid,
            self.odds_spread,
            self.liquidity,
            self.funding_8h,
            self.funding_1d,
            self.fgi,
            self.pnl30d,
            self.vol30d,
        ]
    }
}

/// Raw range `(min, max)` for a canonical feature name
pub fn feature_range(name: &str) -> Option<(f64, f64)> {
    FEATURE_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| RAW_RANGES[i])
}

fn range_midpoint((min, max): (f64, f64)) -> f64 {
    (min + max) / 2.0
}

/// Normalize one raw scalar into [0,1] via the feature's fixed affine range.
///
/// Non-finite input substitutes the range midpoint (normalizing to 0.5),
/// as does an unknown feature name.
pub fn normalize_feature(name: &str, raw: f64) -> f64 {
    let Some((min, max)) = feature_range(name) else {
        return 0.5;
    };
    let value = if raw.is_finite() {
        raw
    } else {
        range_midpoint((min, max))
    };
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Exact affine inverse of [`normalize_feature`], for diagnostics only
pub fn denormalize_feature(name: &str, normalized: f64) -> f64 {
    let Some((min, max)) = feature_range(name) else {
        return normalized;
    };
    min + normalized * (max - min)
}

/// Best-effort numeric coercion of an upstream JSON value. Accepts numbers
/// and string-typed numerics; everything else (and non-finite results) is
/// None.
fn coerce_numeric(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
}

/// Build a [`FeatureVector`] from raw named inputs keyed by upstream signal
/// names (`oddsMid`, `fgi`, ...). Absent or malformed fields take the
/// feature's neutral default (its raw-range midpoint) before normalization.
pub fn create_feature_vector(inputs: &BTreeMap<String, Value>) -> FeatureVector {
    let mut normalized = [0.5f64; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        let raw = inputs
            .get(RAW_KEYS[i])
            .and_then(coerce_numeric)
            .unwrap_or_else(|| range_midpoint(RAW_RANGES[i]));
        normalized[i] = normalize_feature(FEATURE_NAMES[i], raw);
    }
    FeatureVector {
        odds_mid: normalized[0],
        odds_spread: normalized[1],
        liquidity: normalized[2],
        funding_8h: normalized[3],
        funding_1d: normalized[4],
        fgi: normalized[5],
        pnl30d: normalized[6],
        vol30d: normalized[7],
    }
}
