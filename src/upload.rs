//! Turns the flat recipe-creation form into an API payload.
//!
//! Ingredient fields are every entry whose name starts with `ingredient`.
//! Each non-empty value must be `quantity,unit,description`; all whitespace
//! is removed before splitting and an empty quantity means "to taste".

use crate::error::{AppError, Result};
use crate::recipe::{Ingredient, NewRecipe};

pub const INGREDIENT_PREFIX: &str = "ingredient";

fn field<'a>(form: &'a [(String, String)], name: &str) -> &'a str {
    form.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

pub fn parse_ingredient(line: &str) -> Result<Ingredient> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let parts: Vec<&str> = compact.split(',').collect();
    let [quantity, unit, description] = parts.as_slice() else {
        return Err(AppError::Format(format!(
            "wrong ingredient format {:?}, use 'quantity,unit,description'",
            line
        )));
    };

    let quantity = if quantity.is_empty() {
        None
    } else {
        let value = quantity
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .ok_or_else(|| AppError::Format(format!("{:?} has a non-numeric quantity", line)))?;
        Some(value)
    };

    Ok(Ingredient {
        quantity,
        unit: unit.to_string(),
        description: description.to_string(),
    })
}

/// Selects and parses all ingredient lines in form order. A single bad line
/// rejects the whole form.
pub fn parse_ingredients(form: &[(String, String)]) -> Result<Vec<Ingredient>> {
    form.iter()
        .filter(|(key, value)| key.starts_with(INGREDIENT_PREFIX) && !value.is_empty())
        .map(|(_, value)| parse_ingredient(value))
        .collect()
}

fn parse_number(form: &[(String, String)], name: &str) -> Result<f64> {
    let raw = field(form, name).trim();
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| AppError::Format(format!("{} must be a number, got {:?}", name, raw)))
}

pub fn build_payload(form: &[(String, String)]) -> Result<NewRecipe> {
    let ingredients = parse_ingredients(form)?;

    let servings = parse_number(form, "servings")?;
    if servings <= 0.0 {
        return Err(AppError::Format(format!("servings must be positive, got {}", servings)));
    }
    let cooking_time = parse_number(form, "cookingTime")?;
    if cooking_time < 0.0 {
        return Err(AppError::Format(format!(
            "cookingTime must not be negative, got {}",
            cooking_time
        )));
    }

    Ok(NewRecipe {
        title: field(form, "title").to_string(),
        source_url: field(form, "sourceUrl").to_string(),
        image_url: field(form, "image").to_string(),
        publisher: field(form, "publisher").to_string(),
        cooking_time,
        servings,
        ingredients,
    })
}
