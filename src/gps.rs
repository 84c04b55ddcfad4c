//! GPS traces: one `gps_data` row per position, regrouped into traces on read.

use crate::dlog;
use crate::error::StoreError;
use crate::repository::{self, RowError, f64_field, id_field, row, string_field, timestamp_field};
use crate::store::{Row, SelectQuery, Store};
use crate::timestamp;
use crate::types::{ExerciseMetadata, GpsData, GpsPosition};
use crate::utils::new_row_id;
use std::collections::HashMap;
use std::sync::Arc;

pub const TABLE: &str = "gps_data";

pub const COLUMNS: [&str; 9] = [
    "id",
    "exercise_id",
    "timestamp",
    "position_timestamp",
    "latitude",
    "longitude",
    "altitude",
    "speed",
    "accuracy",
];

const ORDER_BY: &str = "timestamp ASC, position_timestamp ASC";

pub struct GpsRepository {
    store: Arc<dyn Store>,
}

impl GpsRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Store every position of `data` in a single insert.
    ///
    /// Empty traces are sent as-is; rejecting them is the service's job.
    pub fn save(&self, data: &GpsData) -> Result<(), StoreError> {
        let rows = to_rows(data);
        dlog!(
            "gps_save exercise_id={} positions={}",
            data.meta.exercise_id,
            rows.len()
        );
        self.store.insert(TABLE, &rows)
    }

    /// All traces stored for `exercise_id`, positions in store order.
    ///
    /// Returns an empty list when the store cannot be reached.
    pub fn get_by_exercise_id(&self, exercise_id: &str) -> Vec<GpsData> {
        let query = SelectQuery::new(TABLE, &COLUMNS)
            .filter("exercise_id", exercise_id)
            .order_by(ORDER_BY);

        let rows = repository::fetch(self.store.as_ref(), &query, decode_row);
        let traces = group_by_exercise(rows);
        if traces.len() > 1 {
            tracing::warn!(exercise_id, traces = traces.len(), "select returned several exercises");
        }
        traces
    }
}

/// Flatten a trace into rows. Each row gets its own fresh id.
pub fn to_rows(data: &GpsData) -> Vec<Row> {
    let meta_ts = timestamp::encode(data.meta.timestamp);

    data.positions
        .iter()
        .map(|p| {
            row([
                ("id", new_row_id().into()),
                ("exercise_id", data.meta.exercise_id.clone().into()),
                ("timestamp", meta_ts.clone().into()),
                ("position_timestamp", timestamp::encode(p.timestamp).into()),
                ("latitude", p.latitude.into()),
                ("longitude", p.longitude.into()),
                ("altitude", p.altitude.into()),
                ("speed", p.speed.into()),
                ("accuracy", p.accuracy.into()),
            ])
        })
        .collect()
}

#[derive(Debug)]
struct PositionRow {
    meta: ExerciseMetadata,
    position: GpsPosition,
}

fn decode_row(r: &Row) -> Result<PositionRow, RowError> {
    Ok(PositionRow {
        meta: ExerciseMetadata {
            id: id_field(r)?,
            exercise_id: string_field(r, "exercise_id")?,
            timestamp: timestamp_field(r, "timestamp")?,
        },
        position: GpsPosition {
            timestamp: timestamp_field(r, "position_timestamp")?,
            latitude: f64_field(r, "latitude")?,
            longitude: f64_field(r, "longitude")?,
            altitude: f64_field(r, "altitude")?,
            speed: f64_field(r, "speed")?,
            accuracy: f64_field(r, "accuracy")?,
        },
    })
}

/// Group rows by `exercise_id`, in order of first appearance.
///
/// The first row of each group provides the trace metadata. Positions keep
/// the order the rows arrived in.
fn group_by_exercise(rows: Vec<PositionRow>) -> Vec<GpsData> {
    let mut traces: Vec<GpsData> = Vec::new();
    let mut by_exercise: HashMap<String, usize> = HashMap::new();

    for PositionRow { meta, position } in rows {
        if let Some(&i) = by_exercise.get(&meta.exercise_id) {
            traces[i].positions.push(position);
        } else {
            by_exercise.insert(meta.exercise_id.clone(), traces.len());
            traces.push(GpsData {
                meta,
                positions: vec![position],
            });
        }
    }

    traces
}
