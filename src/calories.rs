use crate::error::StoreError;
use crate::repository::{self, RowError, f64_field, id_field, row, string_field, timestamp_field};
use crate::store::{Row, SelectQuery, Store};
use crate::timestamp;
use crate::types::{CaloriesData, UserMetadata};
use crate::utils::new_row_id;
use std::sync::Arc;

pub const TABLE: &str = "calories_data";

pub const COLUMNS: [&str; 4] = ["id", "user_id", "timestamp", "calories"];

pub struct CaloriesRepository {
    store: Arc<dyn Store>,
}

impl CaloriesRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn save(&self, data: &CaloriesData) -> Result<(), StoreError> {
        self.store.insert(TABLE, &[to_row(data)])
    }

    pub fn get_by_user_id(&self, user_id: &str) -> Vec<CaloriesData> {
        let query = SelectQuery::new(TABLE, &COLUMNS)
            .filter("user_id", user_id)
            .order_by("timestamp ASC");

        repository::fetch(self.store.as_ref(), &query, decode_row)
    }
}

pub fn to_row(data: &CaloriesData) -> Row {
    let id = if data.meta.id.is_empty() {
        new_row_id()
    } else {
        data.meta.id.clone()
    };

    row([
        ("id", id.into()),
        ("user_id", data.meta.user_id.clone().into()),
        ("timestamp", timestamp::encode(data.meta.timestamp).into()),
        ("calories", data.calories.into()),
    ])
}

fn decode_row(r: &Row) -> Result<CaloriesData, RowError> {
    Ok(CaloriesData {
        meta: UserMetadata {
            id: id_field(r)?,
            user_id: string_field(r, "user_id")?,
            timestamp: timestamp_field(r, "timestamp")?,
        },
        calories: f64_field(r, "calories")?,
    })
}
