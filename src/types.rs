use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMetadata {
    /// Row identity. May be empty, in which case a fresh id is generated on save.
    #[serde(default)]
    pub id: String,
    pub exercise_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Identifies one user-scoped event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsPosition {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub accuracy: f64,
}

/// A GPS trace: one stored row per position, all sharing the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsData {
    pub meta: ExerciseMetadata,
    pub positions: Vec<GpsPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateData {
    pub meta: ExerciseMetadata,
    pub bpm: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloriesData {
    pub meta: UserMetadata,
    pub calories: f64,
}
