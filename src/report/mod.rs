//! Artifact writers.
//!
//! Two files per run: the structured review records as JSON, and the
//! clustered frequency table as delimited rows. Field quoting for the
//! table is handled locally; labels are free text from a language model
//! and can contain the delimiter.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::{DelightPoint, ExtractedReview};

/// Header row of the frequency table artifact.
const FREQUENCY_HEADER: &str = "Delight Point,Frequency";

#[derive(Serialize)]
struct RecordsArtifact<'a> {
    reviews: &'a [ExtractedReview],
}

/// Write the structured records artifact: `{"reviews": [...]}`,
/// pretty-printed.
pub fn write_records(path: &Path, records: &[ExtractedReview]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &RecordsArtifact { reviews: records })?;
    writer.flush()?;
    Ok(())
}

/// Write the frequency table artifact, one row per cluster, already sorted
/// by the aggregator.
pub fn write_frequency_table(path: &Path, points: &[DelightPoint]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{FREQUENCY_HEADER}")?;
    for point in points {
        writeln!(writer, "{},{}", csv_field(&point.label), point.frequency)?;
    }

    writer.flush()?;
    Ok(())
}

/// Quote a field when it contains the delimiter, a quote, or a newline;
/// embedded quotes are doubled.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
