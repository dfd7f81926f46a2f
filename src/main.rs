//! Probability calibration engine CLI
//!
//! Trains, calibrates, and evaluates binary-outcome forecasting models
//! over JSON datasets of labeled market signals.

use clap::{Parser, Subcommand};
use predikt_core::{
    eval::{evaluate, DEFAULT_BINS},
    features::FeatureVector,
    platt::{calibrate_probabilities, fit_platt_scaling, PlattConfig},
    predictor::{feature_importance, predict_proba},
    store::{load_model, load_scaling, save_model, save_scaling},
    trainer::{fit, TrainConfig},
    types::{LabeledDataPoint, RawDataPoint},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "predikt-core")]
#[command(about = "Probability calibration engine for binary-outcome forecasts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a logistic model on a labeled dataset
    Train {
        /// JSON dataset of labeled points
        #[arg(short, long)]
        dataset: String,
        /// Where to write the model artifact
        #[arg(short, long)]
        output: String,
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,
        #[arg(long, default_value = "1000")]
        max_iterations: usize,
        #[arg(long, default_value = "1e-6")]
        convergence_threshold: f64,
        #[arg(long, default_value = "0.01")]
        regularization: f64,
    },
    /// Fit a Platt scaling transform from a model's raw outputs
    Calibrate {
        /// Model artifact to calibrate
        #[arg(short, long)]
        model: String,
        /// JSON dataset of matured outcomes
        #[arg(short, long)]
        dataset: String,
        /// Where to write the platt artifact
        #[arg(short, long)]
        output: String,
        #[arg(long, default_value = "0.2")]
        holdout_ratio: f64,
        /// Explicit shuffle seed for a reproducible holdout split
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate model (optionally calibrated) predictions against outcomes
    Evaluate {
        #[arg(short, long)]
        model: String,
        #[arg(short, long)]
        dataset: String,
        /// Platt artifact to apply before scoring
        #[arg(short, long)]
        platt: Option<String>,
        #[arg(long, default_value_t = DEFAULT_BINS)]
        bins: usize,
    },
    /// Show relative feature importance for a trained model
    Importance {
        #[arg(short, long)]
        model: String,
    },
}

fn load_dataset(path: &str) -> anyhow::Result<(Vec<FeatureVector>, Vec<bool>)> {
    let raw: Vec<RawDataPoint> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let points: Vec<LabeledDataPoint> = raw.iter().map(LabeledDataPoint::from).collect();
    let features = points.iter().map(|p| p.features).collect();
    let labels = points.iter().map(|p| p.label).collect();
    Ok((features, labels))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            dataset,
            output,
            learning_rate,
            max_iterations,
            convergence_threshold,
            regularization,
        } => {
            let (x, y) = load_dataset(&dataset)?;
            let config = TrainConfig {
                learning_rate,
                max_iterations,
                convergence_threshold,
                regularization,
            };
            let model = fit(&x, &y, &config)?;
            save_model(&model, &output)?;
            let last = model.training_history.last();
            println!(
                "trained on {} samples, stopped at iteration {}, final loss {:.6}",
                model.metadata.training_samples,
                model.metadata.convergence_iterations,
                last.map(|s| s.loss).unwrap_or(f64::NAN),
            );
        }
        Commands::Calibrate {
            model,
            dataset,
            output,
            holdout_ratio,
            seed,
        } => {
            let model = load_model(&model)?;
            let (x, y) = load_dataset(&dataset)?;
            let raw = predict_proba(&model, &x);
            let config = PlattConfig {
                holdout_ratio,
                seed,
                ..PlattConfig::default()
            };
            let scaling = fit_platt_scaling(&raw, &y, &config)?;
            save_scaling(&scaling, &output)?;
            println!(
                "platt fit: a={:.4} b={:.4} holdout brier {:.4} -> {:.4} (improvement {:+.4})",
                scaling.a,
                scaling.b,
                scaling.metadata.original_brier_score,
                scaling.metadata.calibrated_brier_score,
                scaling.metadata.improvement,
            );
        }
        Commands::Evaluate {
            model,
            dataset,
            platt,
            bins,
        } => {
            let model = load_model(&model)?;
            let (x, y) = load_dataset(&dataset)?;
            let mut predictions = predict_proba(&model, &x);
            if let Some(path) = platt {
                let scaling = load_scaling(&path)?;
                predictions = calibrate_probabilities(&predictions, &scaling);
            }
            let result = evaluate(&predictions, &y, bins)?;
            println!(
                "brier {:.4}  log-loss {:.4}  accuracy {:.2}%",
                result.brier_score,
                result.log_loss,
                result.accuracy * 100.0,
            );
            println!(
                "reliability {:.4}  resolution {:.4}  uncertainty {:.4}",
                result.reliability, result.resolution, result.uncertainty,
            );
            for bin in result.bins.iter().filter(|b| b.count > 0) {
                println!(
                    "[{:.1}, {:.1}) n={:<4} pred {:.3} outcome {:.3} wilson [{:.3}, {:.3}]{}",
                    bin.range_start,
                    bin.range_end,
                    bin.count,
                    bin.mean_prediction,
                    bin.mean_outcome,
                    bin.wilson_low,
                    bin.wilson_high,
                    if bin.flagged { "  FLAGGED" } else { "" },
                );
            }
        }
        Commands::Importance { model } => {
            let model = load_model(&model)?;
            let mut ranked: Vec<_> = feature_importance(&model).into_iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (name, weight) in ranked {
                println!("{name:<12} {weight:.4}");
            }
        }
    }

    Ok(())
}
