use axum::extract::{Path, State};
use axum::response::Html;

use crate::error::ApiResult;
use crate::routes::recipes::inventory_index;
use crate::state::AppState;

/// `GET /recipe/{id}`
pub async fn recipe_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Html<String>> {
    let recipe = state.db.recipes().get(id).await?;
    let index = inventory_index(&state).await?;
    Ok(Html(state.renderer.render(&recipe, &index)))
}
