//! The single application state container.
//!
//! All mutation goes through [`Model`]. Remote calls run without holding the
//! state lock; their results are committed afterwards, and only the most
//! recently issued request of each kind is allowed to commit. There is no
//! cancellation of in-flight requests, a superseded response is simply
//! dropped. Beyond that the container assumes callers serialize user actions.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::gateway::RecipeGateway;
use crate::pager;
use crate::recipe::{self, Recipe, SearchResultSummary};
use crate::scale::scale_ingredients;
use crate::store::{BOOKMARKS_KEY, Store};
use crate::upload;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
    pub query: String,
    pub results: Vec<SearchResultSummary>,
    pub results_per_page: usize,
    pub page: usize,
}

impl SearchSession {
    fn new(results_per_page: usize) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            results_per_page,
            page: 1,
        }
    }

    pub fn page_count(&self) -> usize {
        pager::page_count(self.results.len(), self.results_per_page)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppState {
    pub recipe: Option<Recipe>,
    pub search: SearchSession,
    pub bookmarks: Vec<Recipe>,
}

struct Inner {
    state: AppState,
    recipe_ticket: u64,
    search_ticket: u64,
}

pub struct Model {
    gateway: Arc<dyn RecipeGateway>,
    store: Arc<dyn Store>,
    inner: Mutex<Inner>,
}

impl Model {
    /// Creates the container and restores bookmarks from `store`. A missing
    /// or unreadable stored list starts the container with no bookmarks.
    /// `results_per_page` must be positive; 0 is treated as 1.
    pub fn new(gateway: Arc<dyn RecipeGateway>, store: Arc<dyn Store>, results_per_page: usize) -> Self {
        debug_assert!(results_per_page > 0, "results_per_page must be positive");
        let bookmarks = restore_bookmarks(store.as_ref());
        info!("Restored {} bookmarks", bookmarks.len());

        Self {
            gateway,
            store,
            inner: Mutex::new(Inner {
                state: AppState {
                    recipe: None,
                    search: SearchSession::new(results_per_page.max(1)),
                    bookmarks,
                },
                recipe_ticket: 0,
                search_ticket: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> AppState {
        self.lock().state.clone()
    }

    pub fn recipe(&self) -> Option<Recipe> {
        self.lock().state.recipe.clone()
    }

    pub fn search(&self) -> SearchSession {
        self.lock().state.search.clone()
    }

    pub fn bookmarks(&self) -> Vec<Recipe> {
        self.lock().state.bookmarks.clone()
    }

    /// Fetches and installs a recipe as the current one, returning it. On
    /// failure the current recipe is cleared. A response superseded by a
    /// newer load is returned to its caller but not installed.
    pub async fn load_recipe(&self, id: &str) -> Result<Recipe> {
        if id.trim().is_empty() {
            return Err(AppError::InvalidArgument("recipe id must not be empty".to_string()));
        }

        let ticket = {
            let mut inner = self.lock();
            inner.recipe_ticket += 1;
            inner.recipe_ticket
        };

        let result = self.gateway.fetch_recipe(id).await;

        let mut inner = self.lock();
        let latest = inner.recipe_ticket == ticket;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) if latest => {
                warn!("Failed to load recipe {}: {}", id, e);
                inner.state.recipe = None;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let mut recipe = recipe::normalize(raw);
        recipe.bookmarked = inner.state.bookmarks.iter().any(|b| b.id == id);
        if latest {
            info!("Loaded recipe {} ({})", id, recipe.title);
            inner.state.recipe = Some(recipe.clone());
        } else {
            debug!("Discarding superseded response for recipe {}", id);
        }
        Ok(recipe)
    }

    /// Replaces the search query and results. The current page is left as is.
    /// An empty query does nothing.
    pub async fn load_search_results(&self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            debug!("Ignoring empty search query");
            return Ok(());
        }

        let ticket = {
            let mut inner = self.lock();
            inner.search_ticket += 1;
            inner.search_ticket
        };

        let raws = self.gateway.search_recipes(query).await;

        let mut inner = self.lock();
        if inner.search_ticket != ticket {
            debug!("Discarding superseded search results for {:?}", query);
            return raws.map(|_| ());
        }

        let raws = raws.inspect_err(|e| warn!("Search for {:?} failed: {}", query, e))?;
        let session = &mut inner.state.search;
        session.query = query.to_string();
        session.results = raws.into_iter().map(recipe::summarize).collect();
        info!("Search for {:?} found {} recipes", query, session.results.len());
        Ok(())
    }

    /// Returns one page of the current results and records it as the
    /// current page. Defaults to page 1.
    pub fn get_search_result_page(&self, page: Option<usize>) -> Result<Vec<SearchResultSummary>> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::InvalidArgument("pages start at 1".to_string()));
        }

        let mut inner = self.lock();
        let session = &mut inner.state.search;
        session.page = page;
        Ok(pager::page_slice(&session.results, page, session.results_per_page).to_vec())
    }

    pub fn update_servings(&self, new_servings: f64) -> Result<()> {
        let mut inner = self.lock();
        let recipe = inner
            .state
            .recipe
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("no recipe is loaded".to_string()))?;

        scale_ingredients(&mut recipe.ingredients, recipe.servings, new_servings)?;
        debug!("Scaled recipe {} from {} to {} servings", recipe.id, recipe.servings, new_servings);
        recipe.servings = new_servings;
        Ok(())
    }

    pub fn add_bookmark(&self, recipe: &Recipe) {
        let mut inner = self.lock();
        self.insert_bookmark(&mut inner, recipe);
    }

    pub fn delete_bookmark(&self, id: &str) {
        let mut inner = self.lock();
        self.remove_bookmark(&mut inner, id);
    }

    /// Bookmarks the current recipe, or removes its bookmark if it already
    /// has one. Returns the new bookmarked flag.
    pub fn toggle_bookmark(&self) -> Result<bool> {
        let mut inner = self.lock();
        let current = inner
            .state
            .recipe
            .clone()
            .ok_or_else(|| AppError::InvalidState("no recipe is loaded".to_string()))?;

        if current.bookmarked {
            self.remove_bookmark(&mut inner, &current.id);
        } else {
            self.insert_bookmark(&mut inner, &current);
        }
        Ok(!current.bookmarked)
    }

    /// Creates a recipe from the submission form, makes it the current
    /// recipe and bookmarks it. Nothing changes if the form is malformed or
    /// the remote call fails.
    pub async fn upload_recipe(&self, form: &[(String, String)]) -> Result<Recipe> {
        let payload = upload::build_payload(form)?;

        let ticket = {
            let mut inner = self.lock();
            inner.recipe_ticket += 1;
            inner.recipe_ticket
        };

        let raw = self
            .gateway
            .create_recipe(&payload)
            .await
            .inspect_err(|e| warn!("Failed to upload recipe {:?}: {}", payload.title, e))?;

        let mut recipe = recipe::normalize(raw);
        info!("Created recipe {} ({})", recipe.id, recipe.title);
        if !recipe.is_user_recipe() {
            warn!("Created recipe {} came back without an authorship key", recipe.id);
        }

        let mut inner = self.lock();
        self.insert_bookmark(&mut inner, &recipe);
        recipe.bookmarked = true;
        if inner.recipe_ticket == ticket {
            inner.state.recipe = Some(recipe.clone());
        } else {
            debug!("Upload of {} superseded, keeping current recipe", recipe.id);
        }
        Ok(recipe)
    }

    fn insert_bookmark(&self, inner: &mut Inner, recipe: &Recipe) {
        if inner.state.bookmarks.iter().any(|b| b.id == recipe.id) {
            debug!("Recipe {} is already bookmarked", recipe.id);
        } else {
            let mut saved = recipe.clone();
            saved.bookmarked = true;
            inner.state.bookmarks.push(saved);
            info!("Bookmarked recipe {}", recipe.id);
            self.persist(&inner.state.bookmarks);
        }

        if let Some(current) = inner.state.recipe.as_mut() {
            if current.id == recipe.id {
                current.bookmarked = true;
            }
        }
    }

    fn remove_bookmark(&self, inner: &mut Inner, id: &str) {
        match inner.state.bookmarks.iter().position(|b| b.id == id) {
            Some(index) => {
                inner.state.bookmarks.remove(index);
                info!("Removed bookmark {}", id);
                self.persist(&inner.state.bookmarks);
            }
            None => debug!("No bookmark {} to remove", id),
        }

        if let Some(current) = inner.state.recipe.as_mut() {
            if current.id == id {
                current.bookmarked = false;
            }
        }
    }

    fn persist(&self, bookmarks: &[Recipe]) {
        match serde_json::to_string(bookmarks) {
            Ok(text) => self.store.set(BOOKMARKS_KEY, &text),
            Err(e) => warn!("Failed to serialize bookmarks: {}", e),
        }
    }
}

fn restore_bookmarks(store: &dyn Store) -> Vec<Recipe> {
    let Some(text) = store.get(BOOKMARKS_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Recipe>>(&text) {
        Ok(stored) => {
            let mut bookmarks: Vec<Recipe> = Vec::with_capacity(stored.len());
            for mut recipe in stored {
                if bookmarks.iter().any(|b| b.id == recipe.id) {
                    continue;
                }
                recipe.bookmarked = true;
                bookmarks.push(recipe);
            }
            bookmarks
        }
        Err(e) => {
            warn!("Ignoring unreadable stored bookmarks: {}", e);
            Vec::new()
        }
    }
}
