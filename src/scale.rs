use crate::error::{AppError, Result};
use crate::recipe::Ingredient;

/// Rescales every known quantity from `old_servings` to `new_servings`.
/// Quantities of `None` stay `None`.
pub fn scale_ingredients(
    ingredients: &mut [Ingredient],
    old_servings: f64,
    new_servings: f64,
) -> Result<()> {
    if !(old_servings.is_finite() && old_servings > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "current servings must be positive, got {}",
            old_servings
        )));
    }
    if !(new_servings.is_finite() && new_servings > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "servings must be positive, got {}",
            new_servings
        )));
    }

    for ingredient in ingredients.iter_mut() {
        if let Some(quantity) = ingredient.quantity.as_mut() {
            *quantity = *quantity * new_servings / old_servings;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(quantity: Option<f64>) -> Ingredient {
        Ingredient {
            quantity,
            unit: "g".to_string(),
            description: "flour".to_string(),
        }
    }

    #[test]
    fn scales_proportionally_and_leaves_unknown_quantities() {
        let mut ingredients = vec![ingredient(Some(200.0)), ingredient(None), ingredient(Some(0.5))];
        scale_ingredients(&mut ingredients, 4.0, 6.0).unwrap();
        assert_eq!(ingredients[0].quantity, Some(300.0));
        assert_eq!(ingredients[1].quantity, None);
        assert_eq!(ingredients[2].quantity, Some(0.75));
    }

    #[test]
    fn scaling_back_restores_original_quantities() {
        let original = [1.0, 0.333, 17.5, 2.0 / 3.0];
        for (old, new) in [(4.0, 7.0), (3.0, 1.0), (2.0, 9.0), (5.0, 5.0)] {
            let mut ingredients: Vec<_> = original.iter().map(|q| ingredient(Some(*q))).collect();
            scale_ingredients(&mut ingredients, old, new).unwrap();
            scale_ingredients(&mut ingredients, new, old).unwrap();
            for (ing, q) in ingredients.iter().zip(original) {
                let scaled = ing.quantity.unwrap();
                assert!((scaled - q).abs() < 1e-9, "{} != {}", scaled, q);
            }
        }
    }

    #[test]
    fn zero_old_servings_is_rejected_without_touching_quantities() {
        let mut ingredients = vec![ingredient(Some(2.0))];
        let err = scale_ingredients(&mut ingredients, 0.0, 4.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(ingredients[0].quantity, Some(2.0));
    }

    #[test]
    fn non_positive_new_servings_is_rejected() {
        let mut ingredients = vec![ingredient(Some(2.0))];
        assert!(scale_ingredients(&mut ingredients, 4.0, 0.0).is_err());
        assert!(scale_ingredients(&mut ingredients, 4.0, -1.0).is_err());
        assert!(scale_ingredients(&mut ingredients, 4.0, f64::NAN).is_err());
        assert_eq!(ingredients[0].quantity, Some(2.0));
    }
}
