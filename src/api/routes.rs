use axum::{
    routing::{delete, get, post, put},
    Router,
    extract::{Form, Json, Path, Query, State},
};
use tower_http::cors::{CorsLayer, Any};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::api::models::{BookmarkToggleResponse, SearchPageResponse, SearchRequest, ServingsRequest};
use crate::api::response::{self, Reply};
use crate::recipe::Recipe;
use crate::{pager, ServerState};

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/api/recipes", post(upload_recipe_handler))
        .route("/api/recipes/:id", get(load_recipe_handler))
        .route("/api/search", get(search_handler))
        .route("/api/search/pages/:page", get(search_page_handler))
        .route("/api/recipe/servings", put(servings_handler))
        .route("/api/recipe/bookmark", post(toggle_bookmark_handler))
        .route("/api/bookmarks", get(bookmarks_handler))
        .route("/api/bookmarks/:id", delete(delete_bookmark_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn current_recipe(state: &ServerState) -> Result<Recipe> {
    state
        .model
        .recipe()
        .ok_or_else(|| AppError::InvalidState("no recipe is loaded".to_string()))
}

async fn load_recipe_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Reply<Recipe>> {
    info!("Loading recipe {}", id);
    let recipe = state.model.load_recipe(&id).await?;
    Ok(response::success(recipe))
}

async fn search_handler(
    State(state): State<ServerState>,
    Query(req): Query<SearchRequest>,
) -> Result<Reply<SearchPageResponse>> {
    info!("Searching for {:?}", req.query);
    state.model.load_search_results(&req.query).await?;
    if req.query.trim().is_empty() {
        // Nothing was searched, show the session as it stands
        let session = state.model.search();
        let results = pager::page_slice(&session.results, session.page, session.results_per_page).to_vec();
        return Ok(response::success(SearchPageResponse::new(&session, results)));
    }

    let results = state.model.get_search_result_page(None)?;
    Ok(response::success(SearchPageResponse::new(&state.model.search(), results)))
}

async fn search_page_handler(
    State(state): State<ServerState>,
    Path(page): Path<usize>,
) -> Result<Reply<SearchPageResponse>> {
    debug!("Turning to search page {}", page);
    let results = state.model.get_search_result_page(Some(page))?;
    Ok(response::success(SearchPageResponse::new(&state.model.search(), results)))
}

async fn servings_handler(
    State(state): State<ServerState>,
    Json(req): Json<ServingsRequest>,
) -> Result<Reply<Recipe>> {
    debug!("Updating servings to {}", req.servings);
    state.model.update_servings(req.servings)?;
    Ok(response::success(current_recipe(&state)?))
}

async fn toggle_bookmark_handler(
    State(state): State<ServerState>,
) -> Result<Reply<BookmarkToggleResponse>> {
    let bookmarked = state.model.toggle_bookmark()?;
    let recipe = current_recipe(&state)?;
    Ok(response::success(BookmarkToggleResponse {
        id: recipe.id,
        bookmarked,
    }))
}

async fn bookmarks_handler(State(state): State<ServerState>) -> Reply<Vec<Recipe>> {
    response::success(state.model.bookmarks())
}

async fn delete_bookmark_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Reply<Vec<Recipe>> {
    state.model.delete_bookmark(&id);
    response::success(state.model.bookmarks())
}

async fn upload_recipe_handler(
    State(state): State<ServerState>,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Reply<Recipe>> {
    info!("Uploading recipe with {} form fields", form.len());
    let recipe = state.model.upload_recipe(&form).await?;
    Ok(response::created(recipe))
}
