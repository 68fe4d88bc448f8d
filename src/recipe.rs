//! Recipe data model and the mapping from remote API records into it.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// `None` means "to taste".
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub servings: f64,
    pub cooking_time: f64,
    pub ingredients: Vec<Ingredient>,
    /// Authorship key, only present on user-submitted recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Recomputed from bookmark membership, never authoritative.
    #[serde(default)]
    pub bookmarked: bool,
}

impl Recipe {
    pub fn is_user_recipe(&self) -> bool {
        self.key.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultSummary {
    pub id: String,
    pub title: String,
    pub publisher: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Recipe record as the remote API returns it. Every field defaults so a
/// record with missing fields still maps instead of failing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecipe {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub servings: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cooking_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    pub key: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchResult {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    pub key: Option<String>,
}

/// Payload for creating a recipe, in the remote API's field naming.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub source_url: String,
    pub image_url: String,
    pub publisher: String,
    pub cooking_time: f64,
    pub servings: f64,
    pub ingredients: Vec<Ingredient>,
}

pub fn normalize(raw: RawRecipe) -> Recipe {
    Recipe {
        id: raw.id,
        title: raw.title,
        publisher: raw.publisher,
        source_url: raw.source_url,
        image_url: raw.image_url,
        servings: raw.servings,
        cooking_time: raw.cooking_time,
        ingredients: raw.ingredients,
        key: raw.key,
        bookmarked: false,
    }
}

pub fn summarize(raw: RawSearchResult) -> SearchResultSummary {
    SearchResultSummary {
        id: raw.id,
        title: raw.title,
        publisher: raw.publisher,
        image_url: raw.image_url,
        key: raw.key,
    }
}
