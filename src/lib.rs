//! Probability calibration engine for binary-outcome prediction markets
//!
//! Turns a small set of market-derived signals into a calibrated
//! probability that a proposition resolves YES.
//!
//! ## Architecture
//!
//! ```text
//! raw signals → Normalizer → Trainer → Predictor → Platt Calibrator → Evaluator
//!                                          ↓               ↓
//!                                     model file       platt file (JSON artifacts)
//! ```
//!
//! All computation is synchronous and CPU-bound; every fit/predict/evaluate
//! call operates on its inputs alone and produces a new independent result,
//! so concurrent independent calls are safe without locks.

pub mod error;
pub mod eval;
pub mod features;
pub mod platt;
pub mod predictor;
pub mod store;
pub mod trainer;
pub mod types;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod types_tests;
