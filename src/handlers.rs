use crate::errors::AppError;
use crate::range::RangeId;
use crate::source::SnapshotSource;
use crate::state::AppState;
use crate::ui::render_index;
use crate::view::ViewSnapshot;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    pub tab: Option<String>,
}

/// Page load: refresh the default range, then render the whole page.
pub async fn index<S: SnapshotSource>(State(state): State<AppState<S>>) -> Html<String> {
    state.controller.refresh(state.default_range).await;
    let view = state.controller.snapshot().await;
    Html(render_index(&view, state.controller.display().layout, state.default_range))
}

/// Tab click.
pub async fn refresh<S: SnapshotSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let tab = query
        .tab
        .ok_or_else(|| AppError::bad_request("missing 'tab' query parameter"))?;
    let range: RangeId = tab.parse()?;

    state.controller.refresh(range).await;
    Ok(Json(state.controller.snapshot().await))
}

pub async fn get_view<S: SnapshotSource>(State(state): State<AppState<S>>) -> Json<ViewSnapshot> {
    Json(state.controller.snapshot().await)
}

pub async fn get_chart_svg<S: SnapshotSource>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, AppError> {
    let svg = state
        .controller
        .chart_svg()
        .await
        .ok_or_else(|| AppError::not_found("no chart rendered yet"))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
