pub mod calories;
pub mod cli;
pub mod error;
pub mod gps;
pub mod heart_rate;
pub mod ingest;
pub mod repository;
pub mod service;
pub mod store;
pub mod timestamp;
pub mod types;
pub mod utils;
pub mod validation;
