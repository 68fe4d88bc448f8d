use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::recipe::{NewRecipe, RawRecipe, RawSearchResult};

/// Remote recipe source. Failures are always normalized to `AppError`.
#[async_trait]
pub trait RecipeGateway: Send + Sync {
    async fn fetch_recipe(&self, id: &str) -> Result<RawRecipe>;

    async fn search_recipes(&self, query: &str) -> Result<Vec<RawSearchResult>>;

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RawRecipe>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct RecipeData {
    recipe: RawRecipe,
}

#[derive(Deserialize)]
struct RecipesData {
    recipes: Vec<RawSearchResult>,
}

#[derive(Deserialize)]
struct FailureBody {
    message: String,
}

pub struct HttpGateway {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| AppError::Config(format!("Invalid API URL {:?}: {}", base_url.as_ref(), e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("API URL {} cannot take a path", base_url)));
        }

        let client = ClientBuilder::new()
            .connect_timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, &config.api_key, config.request_timeout)
    }

    /// Appends `id` as a single percent-encoded path segment.
    fn recipe_url(&self, id: &str) -> Result<Url> {
        if matches!(id, "." | "..") {
            return Err(AppError::InvalidArgument(format!("{:?} is not a recipe id", id)));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.query(&[("key", self.api_key.as_str())]);

        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Request timed out after {:?}", self.timeout);
                return Err(AppError::transport(
                    None,
                    format!(
                        "Request took too long! Timeout after {} second(s)",
                        self.timeout.as_secs_f64()
                    ),
                ));
            }
        };

        let status = response.status();
        let body = match tokio::time::timeout(self.timeout, response.text()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AppError::transport(
                    Some(status.as_u16()),
                    "Timed out reading response body",
                ));
            }
        };

        if !status.is_success() {
            let message = serde_json::from_str::<FailureBody>(&body)
                .map(|failure| failure.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            warn!("Recipe API responded {}: {}", status, message);
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(message));
            }
            return Err(AppError::transport(Some(status.as_u16()), message));
        }

        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| {
                AppError::transport(Some(status.as_u16()), format!("Invalid response body: {}", e))
            })
    }
}

#[async_trait]
impl RecipeGateway for HttpGateway {
    async fn fetch_recipe(&self, id: &str) -> Result<RawRecipe> {
        debug!("Fetching recipe {}", id);
        let url = self.recipe_url(id)?;
        let data: RecipeData = self.send(self.client.get(url)).await?;
        Ok(data.recipe)
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RawSearchResult>> {
        debug!("Searching recipes for {:?}", query);
        let request = self
            .client
            .get(self.base_url.clone())
            .query(&[("search", query)]);
        let data: RecipesData = self.send(request).await?;
        debug!("Search for {:?} returned {} results", query, data.recipes.len());
        Ok(data.recipes)
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RawRecipe> {
        debug!("Creating recipe {:?}", recipe.title);
        let request = self.client.post(self.base_url.clone()).json(recipe);
        let data: RecipeData = self.send(request).await?;
        Ok(data.recipe)
    }
}
