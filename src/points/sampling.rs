//! Sampling from an existing tabular source
//!
//! Reads a CSV file with `latitude`/`longitude` columns and keeps a uniform
//! random subset of its rows. The draw uses a fixed internal seed, so the
//! same file and fraction always select the same rows.

use crate::config::{SamplingConfig, SamplingMethod};
use crate::constants::sampling::{LATITUDE_COLUMN, LONGITUDE_COLUMN, SAMPLING_SEED};
use crate::error::{Error, Result};
use crate::points::SourcePoint;
use crate::rng;
use csv::StringRecord;
use geo::Point;
use rand::seq::index;
use std::collections::BTreeMap;
use std::fs::File;
use tracing::debug;

const SALES_POTENTIAL_COLUMN: &str = "sales_potential";
const WORKLOAD_COLUMN: &str = "workload";

/// Sample points from the configured source
///
/// # Returns
/// `round(fraction * rows)` points in draw order. Each point keeps the
/// row's other columns; numeric `sales_potential`/`workload` columns fill
/// the matching fields. No synthetic attributes are added.
///
/// # Errors
/// * `Io` if the source file cannot be opened
/// * `Schema` if a coordinate column is missing or holds a non-number
/// * `Validation` if `fraction` is outside (0, 1]
/// * `NotSupported` for an unknown method
pub fn sample(config: &SamplingConfig) -> Result<Vec<SourcePoint>> {
    let method: SamplingMethod = config.method.parse()?;
    if !(config.fraction > 0.0 && config.fraction <= 1.0) {
        return Err(Error::Validation(format!(
            "Sampling fraction must be in (0, 1], got {}",
            config.fraction
        )));
    }

    let file = File::open(&config.source_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let lat_idx = column_index(&headers, LATITUDE_COLUMN);
    let lon_idx = column_index(&headers, LONGITUDE_COLUMN);
    let (lat_idx, lon_idx) = match (lat_idx, lon_idx) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            let missing: Vec<&str> = [(LATITUDE_COLUMN, lat_idx), (LONGITUDE_COLUMN, lon_idx)]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| *name)
                .collect();
            return Err(Error::Schema(format!(
                "Source {} is missing required column(s): {}",
                config.source_path.display(),
                missing.join(", ")
            )));
        }
    };

    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    let amount = (config.fraction * records.len() as f64).round() as usize;
    let selected = match method {
        SamplingMethod::Proportional => {
            let mut stream = rng::seeded(SAMPLING_SEED);
            index::sample(&mut stream, records.len(), amount.min(records.len())).into_vec()
        }
    };

    debug!(
        source = %config.source_path.display(),
        rows = records.len(),
        selected = selected.len(),
        "Sampled source rows"
    );

    selected
        .into_iter()
        .map(|row| to_source_point(&headers, &records[row], row, lat_idx, lon_idx))
        .collect()
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn to_source_point(
    headers: &StringRecord,
    record: &StringRecord,
    row: usize,
    lat_idx: usize,
    lon_idx: usize,
) -> Result<SourcePoint> {
    let lat = parse_coordinate(record, row, lat_idx, LATITUDE_COLUMN)?;
    let lon = parse_coordinate(record, row, lon_idx, LONGITUDE_COLUMN)?;

    let mut point = SourcePoint::new(Point::new(lon, lat));
    let mut columns = BTreeMap::new();

    for (idx, (name, value)) in headers.iter().zip(record.iter()).enumerate() {
        if idx == lat_idx || idx == lon_idx {
            continue;
        }
        let name = name.trim();
        match (name, value.trim().parse::<f64>()) {
            (SALES_POTENTIAL_COLUMN, Ok(v)) => point.sales_potential = Some(v),
            (WORKLOAD_COLUMN, Ok(v)) => point.workload = Some(v),
            _ => {
                columns.insert(name.to_string(), value.to_string());
            }
        }
    }

    point.columns = columns;
    Ok(point)
}

fn parse_coordinate(record: &StringRecord, row: usize, idx: usize, name: &str) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Error::Schema(format!(
                "Row {}: {} value '{}' is not a number",
                row, name, raw
            ))
        })
}
