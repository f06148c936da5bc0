use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{errors::AppError, store::Stores};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub store: String,
    pub uptime_seconds: u64,
}

// Define an AppState struct to hold shared application state
pub struct AppState {
    pub start_time: Instant,
    pub stores: Stores,
    pub version: String,
}
