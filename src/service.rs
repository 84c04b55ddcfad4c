//! Validate-then-persist entry points, one per entity.
//!
//! Validation runs before any request is built, so a `ServiceError::Validation`
//! guarantees nothing was sent to the store.

use crate::calories::CaloriesRepository;
use crate::error::{ServiceError, ValidationError};
use crate::gps::GpsRepository;
use crate::heart_rate::HeartRateRepository;
use crate::store::Store;
use crate::types::{CaloriesData, GpsData, HeartRateData};
use crate::validation;
use std::sync::Arc;

pub struct GpsService {
    repo: GpsRepository,
}

impl GpsService {
    pub fn new(repo: GpsRepository) -> Self {
        Self { repo }
    }

    pub fn save(&self, data: &GpsData) -> Result<(), ServiceError> {
        validation::validate_exercise_metadata(&data.meta)?;
        validation::validate_gps_positions(&data.positions)?;
        self.repo.save(data)?;
        Ok(())
    }

    pub fn get_by_exercise_id(&self, exercise_id: &str) -> Result<Vec<GpsData>, ValidationError> {
        validation::validate_exercise_id(exercise_id)?;
        Ok(self.repo.get_by_exercise_id(exercise_id))
    }
}

pub struct HeartRateService {
    repo: HeartRateRepository,
}

impl HeartRateService {
    pub fn new(repo: HeartRateRepository) -> Self {
        Self { repo }
    }

    pub fn save(&self, data: &HeartRateData) -> Result<(), ServiceError> {
        validation::validate_exercise_metadata(&data.meta)?;
        validation::validate_heart_rate(data.bpm)?;
        self.repo.save(data)?;
        Ok(())
    }

    pub fn get_by_exercise_id(
        &self,
        exercise_id: &str,
    ) -> Result<Vec<HeartRateData>, ValidationError> {
        validation::validate_exercise_id(exercise_id)?;
        Ok(self.repo.get_by_exercise_id(exercise_id))
    }
}

pub struct CaloriesService {
    repo: CaloriesRepository,
}

impl CaloriesService {
    pub fn new(repo: CaloriesRepository) -> Self {
        Self { repo }
    }

    pub fn save(&self, data: &CaloriesData) -> Result<(), ServiceError> {
        validation::validate_user_metadata(&data.meta)?;
        validation::validate_calories(data.calories)?;
        self.repo.save(data)?;
        Ok(())
    }

    pub fn get_by_user_id(&self, user_id: &str) -> Result<Vec<CaloriesData>, ValidationError> {
        validation::validate_user_id(user_id)?;
        Ok(self.repo.get_by_user_id(user_id))
    }
}

/// All three services wired to one shared store.
pub struct Services {
    pub gps: GpsService,
    pub heart_rate: HeartRateService,
    pub calories: CaloriesService,
}

impl Services {
    pub fn new(store: &Arc<dyn Store>) -> Self {
        Self {
            gps: GpsService::new(GpsRepository::new(Arc::clone(store))),
            heart_rate: HeartRateService::new(HeartRateRepository::new(Arc::clone(store))),
            calories: CaloriesService::new(CaloriesRepository::new(Arc::clone(store))),
        }
    }
}
