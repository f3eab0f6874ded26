//! Plant CRUD routes.

use crate::handlers::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn plant_routes(state: AppState) -> Router {
    Router::new()
        .route("/plants", get(list).post(create))
        .route(
            "/plants/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
