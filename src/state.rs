//! Shared application state for all routes.

use crate::config::ErrorDetail;
use crate::repository::PlantRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub plants: Arc<dyn PlantRepository>,
    pub error_detail: ErrorDetail,
}

impl AppState {
    pub fn new(plants: Arc<dyn PlantRepository>, error_detail: ErrorDetail) -> Self {
        AppState { plants, error_detail }
    }
}
