//! Preconditions checked before anything reaches the store.

use crate::error::ValidationError;
use crate::types::{ExerciseMetadata, GpsPosition, UserMetadata};

pub fn validate_exercise_metadata(meta: &ExerciseMetadata) -> Result<(), ValidationError> {
    if meta.id.trim().is_empty() {
        return Err(ValidationError::EmptyMetadataId);
    }
    validate_exercise_id(&meta.exercise_id)
}

pub fn validate_user_metadata(meta: &UserMetadata) -> Result<(), ValidationError> {
    if meta.id.trim().is_empty() {
        return Err(ValidationError::EmptyMetadataId);
    }
    validate_user_id(&meta.user_id)
}

pub fn validate_gps_positions(positions: &[GpsPosition]) -> Result<(), ValidationError> {
    if positions.is_empty() {
        return Err(ValidationError::NoPositions);
    }

    // Written as negated range checks so NaN is rejected too.
    for p in positions {
        if !(-90.0..=90.0).contains(&p.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(p.latitude));
        }
        if !(-180.0..=180.0).contains(&p.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(p.longitude));
        }
        if !(p.accuracy > 0.0) {
            return Err(ValidationError::NonPositiveAccuracy(p.accuracy));
        }
    }

    Ok(())
}

/// Accepts 1..=299 bpm.
pub const fn validate_heart_rate(bpm: i32) -> Result<(), ValidationError> {
    if bpm <= 0 {
        return Err(ValidationError::NonPositiveHeartRate(bpm));
    }
    if bpm >= 300 {
        return Err(ValidationError::HeartRateTooHigh(bpm));
    }
    Ok(())
}

pub fn validate_calories(calories: f64) -> Result<(), ValidationError> {
    if calories >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeCalories(calories))
    }
}

pub fn validate_exercise_id(exercise_id: &str) -> Result<(), ValidationError> {
    if exercise_id.trim().is_empty() {
        return Err(ValidationError::EmptyExerciseId);
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    Ok(())
}
