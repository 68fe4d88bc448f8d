#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_recipe_client::error::{AppError, Result};
use rust_recipe_client::gateway::RecipeGateway;
use rust_recipe_client::model::Model;
use rust_recipe_client::recipe::{Ingredient, NewRecipe, RawRecipe, RawSearchResult};
use rust_recipe_client::store::{MemoryStore, Store};

/// In-process gateway with canned recipes and optional per-id delays.
#[derive(Default)]
pub struct StubGateway {
    pub recipes: HashMap<String, RawRecipe>,
    pub searches: HashMap<String, Vec<RawSearchResult>>,
    pub delays: HashMap<String, Duration>,
    pub fail_uploads: bool,
    pub uploads: Mutex<Vec<NewRecipe>>,
}

impl StubGateway {
    pub fn with_recipe(mut self, raw: RawRecipe) -> Self {
        self.recipes.insert(raw.id.clone(), raw);
        self
    }

    pub fn with_search(mut self, query: &str, count: usize) -> Self {
        let results = (1..=count)
            .map(|n| RawSearchResult {
                id: format!("{}-{}", query, n),
                title: format!("{} #{}", query, n),
                publisher: "Stub Kitchen".to_string(),
                image_url: format!("http://img.test/{}-{}.jpg", query, n),
                key: None,
            })
            .collect();
        self.searches.insert(query.to_string(), results);
        self
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    async fn pause(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl RecipeGateway for StubGateway {
    async fn fetch_recipe(&self, id: &str) -> Result<RawRecipe> {
        self.pause(id).await;
        self.recipes
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RawSearchResult>> {
        self.pause(query).await;
        self.searches
            .get(query)
            .cloned()
            .ok_or_else(|| AppError::transport(Some(500), "search backend down"))
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RawRecipe> {
        self.pause(&recipe.title).await;
        if self.fail_uploads {
            return Err(AppError::transport(Some(400), "Invalid key"));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(recipe.clone());
        Ok(RawRecipe {
            id: format!("user-{}", uploads.len()),
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            source_url: recipe.source_url.clone(),
            image_url: recipe.image_url.clone(),
            servings: recipe.servings,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients.clone(),
            key: Some("stub-key".to_string()),
        })
    }
}

pub fn raw_recipe(id: &str, servings: f64) -> RawRecipe {
    RawRecipe {
        id: id.to_string(),
        title: format!("Recipe {}", id),
        publisher: "Stub Kitchen".to_string(),
        source_url: format!("http://src.test/{}", id),
        image_url: format!("http://img.test/{}.jpg", id),
        servings,
        cooking_time: 30.0,
        ingredients: vec![
            Ingredient {
                quantity: Some(2.0),
                unit: "cups".to_string(),
                description: "flour".to_string(),
            },
            Ingredient {
                quantity: None,
                unit: String::new(),
                description: "salt".to_string(),
            },
        ],
        key: None,
    }
}

pub fn model_with(gateway: StubGateway, store: Arc<MemoryStore>) -> Model {
    let store: Arc<dyn Store> = store;
    Model::new(Arc::new(gateway), store, 10)
}

pub fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
