use crate::error::StoreError;
use crate::repository::{self, RowError, i32_field, id_field, row, string_field, timestamp_field};
use crate::store::{Row, SelectQuery, Store};
use crate::timestamp;
use crate::types::{ExerciseMetadata, HeartRateData};
use crate::utils::new_row_id;
use std::sync::Arc;

pub const TABLE: &str = "heart_rate_data";

pub const COLUMNS: [&str; 4] = ["id", "exercise_id", "timestamp", "bpm"];

pub struct HeartRateRepository {
    store: Arc<dyn Store>,
}

impl HeartRateRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn save(&self, data: &HeartRateData) -> Result<(), StoreError> {
        self.store.insert(TABLE, &[to_row(data)])
    }

    /// Samples for `exercise_id`, oldest first. Empty when the store is unreachable.
    pub fn get_by_exercise_id(&self, exercise_id: &str) -> Vec<HeartRateData> {
        let query = SelectQuery::new(TABLE, &COLUMNS)
            .filter("exercise_id", exercise_id)
            .order_by("timestamp ASC");

        repository::fetch(self.store.as_ref(), &query, decode_row)
    }
}

pub fn to_row(data: &HeartRateData) -> Row {
    let id = if data.meta.id.is_empty() {
        new_row_id()
    } else {
        data.meta.id.clone()
    };

    row([
        ("id", id.into()),
        ("exercise_id", data.meta.exercise_id.clone().into()),
        ("timestamp", timestamp::encode(data.meta.timestamp).into()),
        ("bpm", data.bpm.into()),
    ])
}

fn decode_row(r: &Row) -> Result<HeartRateData, RowError> {
    Ok(HeartRateData {
        meta: ExerciseMetadata {
            id: id_field(r)?,
            exercise_id: string_field(r, "exercise_id")?,
            timestamp: timestamp_field(r, "timestamp")?,
        },
        bpm: i32_field(r, "bpm")?,
    })
}
