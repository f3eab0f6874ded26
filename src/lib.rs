//! Plant API: CRUD REST backend for plant records stored in SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod repository;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Config, ErrorDetail};
pub use error::{AppError, ConfigError};
pub use model::{NewPlant, Plant, PlantPatch};
pub use repository::{PlantRepository, SqlitePlantRepository};
pub use routes::{app, common_routes_with_ready, plant_routes};
pub use state::AppState;
pub use store::{connect, ensure_plants_table};
