//! Ward API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use crate::api::endpoints;
use crate::state::AppState;

/// Build the ward API router.
///
/// Handlers use `State<Arc<AppState>>` (provided via `with_state`). Each
/// request opens its own database connection; concurrent mutations serialize
/// on the database's write lock, never on in-process state.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn ward_api_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/admissions", post(endpoints::admissions::create))
        .route("/admissions/:id", get(endpoints::admissions::detail))
        .route("/admissions/:id/charges", post(endpoints::admissions::append_charge))
        .route("/admissions/:id/discharge", post(endpoints::admissions::discharge))
        .route(
            "/rooms/:id/beds",
            get(endpoints::rooms::snapshot)
                .post(endpoints::rooms::assign_bed)
                .put(endpoints::rooms::bed_action),
        )
        .route("/beds/available", get(endpoints::rooms::available_bed))
        .with_state(state);

    Router::new().nest("/api", routes)
}
