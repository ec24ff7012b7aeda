//! Comma-separated export of enriched footprints.

use std::collections::HashSet;

use building_shapes_footprint_models::{EnrichedFeature, MetricKey};

use crate::ExportError;

/// Property keys with this prefix are internal and never exported.
pub const RESERVED_PREFIX: &str = "__";

/// Builds the export header.
///
/// Original property keys come first in first-seen order across the
/// collection, skipping reserved and computed keys, followed by the
/// computed metric keys in [`MetricKey::COMPUTED`] order. `feature_id` is
/// only included when some feature carries it as an original property.
#[must_use]
pub fn csv_header(features: &[EnrichedFeature]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut header: Vec<String> = features
        .iter()
        .flat_map(|feature| feature.original.keys())
        .filter(|key| !key.starts_with(RESERVED_PREFIX) && !MetricKey::is_computed(key))
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect();

    header.extend(MetricKey::COMPUTED.iter().map(|key| key.as_ref().to_string()));
    header
}

/// Writes the collection as CSV text: a header row and one row per
/// feature, joined by `\n` with no trailing newline.
///
/// Missing and null values are written as empty fields. Fields are quoted
/// only when they contain a comma, a double quote or a line break.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn to_csv(features: &[EnrichedFeature]) -> Result<String, ExportError> {
    let header = csv_header(features);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&header)?;

    for feature in features {
        let properties = feature.properties();
        let row = header.iter().map(|key| {
            properties
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_default()
        });
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }

    log::debug!(
        "Wrote {} CSV row(s) with {} column(s)",
        features.len(),
        header.len()
    );

    Ok(text)
}
