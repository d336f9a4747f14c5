//! HTTP API for the travel planner

mod handlers;
mod types;

pub use handlers::create_router;

use crate::planner::TripPlanner;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
}

impl AppState {
    pub fn new(planner: TripPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
