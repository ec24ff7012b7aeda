#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over enriched footprints.
//!
//! Aggregates each tracked metric across a collection into count, sum,
//! mean, population standard deviation, min and max. Non-finite values are
//! ignored and an empty set summarizes to all zeros.

pub mod format;

use building_shapes_footprint_models::{EnrichedFeature, MetricKey};
use serde::Serialize;

pub use format::{format_number, render_table};

/// Aggregate of one metric across a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    /// The summarized metric.
    pub metric: MetricKey,
    /// Number of finite values.
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    /// Population standard deviation (divides by `count`).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    /// Summarizes `values`, skipping non-finite entries.
    #[must_use]
    pub fn from_values(metric: MetricKey, values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();

        if values.is_empty() {
            return Self {
                metric,
                count: 0,
                sum: 0.0,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            metric,
            count: values.len(),
            sum,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Summarizes one metric across a collection.
#[must_use]
pub fn summarize_metric(features: &[EnrichedFeature], metric: MetricKey) -> MetricSummary {
    MetricSummary::from_values(metric, features.iter().map(|f| f.metrics.value(metric)))
}

/// Summarizes every tracked metric, in [`MetricKey::TRACKED`] order.
#[must_use]
pub fn summarize(features: &[EnrichedFeature]) -> Vec<MetricSummary> {
    log::debug!("Summarizing {} feature(s)", features.len());

    MetricKey::TRACKED
        .iter()
        .map(|&metric| summarize_metric(features, metric))
        .collect()
}
