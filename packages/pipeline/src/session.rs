//! Holds the most recent successful pipeline output.

use building_shapes_footprint_models::EnrichedFeature;
use building_shapes_metrics::ViewFit;
use building_shapes_stats::MetricSummary;

use crate::{PipelineConfig, PipelineError, PipelineOutput, run};

/// Pipeline state across successive loads.
///
/// Each successful [`load`](Self::load) replaces the previous output as a
/// whole. A failed load leaves it untouched.
#[derive(Debug, Default)]
pub struct Session {
    config: PipelineConfig,
    output: Option<PipelineOutput>,
}

impl Session {
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            output: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline over `text` and, on success, makes its output
    /// current.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; the previous output is kept.
    pub fn load(&mut self, text: &str) -> Result<&PipelineOutput, PipelineError> {
        match run(text, &self.config) {
            Ok(output) => Ok(&*self.output.insert(output)),
            Err(e) => {
                log::warn!("Load failed, keeping previous results: {e}");
                Err(e)
            }
        }
    }

    /// Output of the last successful load.
    #[must_use]
    pub const fn output(&self) -> Option<&PipelineOutput> {
        self.output.as_ref()
    }

    /// Enriched features of the last successful load, empty before any.
    #[must_use]
    pub fn features(&self) -> &[EnrichedFeature] {
        self.output
            .as_ref()
            .map(|o| o.features.as_slice())
            .unwrap_or_default()
    }

    /// Summary of the last successful load, empty before any.
    #[must_use]
    pub fn summary(&self) -> &[MetricSummary] {
        self.output
            .as_ref()
            .map(|o| o.summary.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn view(&self) -> Option<&ViewFit> {
        self.output.as_ref().and_then(|o| o.view.as_ref())
    }

    /// Returns `true` once a load has succeeded.
    #[must_use]
    pub const fn can_export(&self) -> bool {
        self.output.is_some()
    }

    /// CSV export of the current output, or `None` before the first
    /// successful load.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be written.
    pub fn export_csv(&self) -> Result<Option<String>, PipelineError> {
        self.output.as_ref().map(PipelineOutput::to_csv).transpose()
    }

    /// Drops the current output.
    pub fn clear(&mut self) {
        self.output = None;
    }
}
