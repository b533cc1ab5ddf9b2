use crate::handlers;
use crate::source::SnapshotSource;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router<S: SnapshotSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/api/refresh", post(handlers::refresh::<S>))
        .route("/api/view", get(handlers::get_view::<S>))
        .route("/api/chart.svg", get(handlers::get_chart_svg::<S>))
        .with_state(state)
}
