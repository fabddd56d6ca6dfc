//! Recipe composition rules, checked before anything touches the database.
//! A rejected payload leaves no partial state: create/update only open their
//! transaction after this passes.

use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_NAME_LEN: usize = 200;

/// One (ingredient, amount) line of a recipe payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeIngredientRequest {
    /// Catalog ingredient id
    pub id: Uuid,
    pub amount: i32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecipeValidationError {
    #[error("Recipe name cannot be empty")]
    EmptyName,

    #[error("Recipe name must contain at most {MAX_NAME_LEN} characters")]
    NameTooLong,

    #[error("Recipe must list at least one ingredient")]
    EmptyIngredients,

    #[error("Ingredient amounts must be at least 1")]
    InvalidAmount,

    #[error("The same ingredient cannot be listed twice")]
    DuplicateIngredient,

    #[error("Tag selection must be between 1 and {catalog_size} distinct tags")]
    InvalidTagSelection { catalog_size: i64 },

    #[error("Cooking time must be at least 1")]
    InvalidCookingTime,
}

impl From<RecipeValidationError> for ApiError {
    fn from(err: RecipeValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Validate a candidate recipe payload against the composition rules.
///
/// `catalog_tag_count` is the current number of tags in the catalog; a tag
/// selection can never be larger than the catalog it draws from.
pub fn validate_recipe(
    name: &str,
    cooking_time: i32,
    ingredients: &[RecipeIngredientRequest],
    tag_ids: &[Uuid],
    catalog_tag_count: i64,
) -> Result<(), RecipeValidationError> {
    if name.trim().is_empty() {
        return Err(RecipeValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RecipeValidationError::NameTooLong);
    }

    if cooking_time < 1 {
        return Err(RecipeValidationError::InvalidCookingTime);
    }

    if ingredients.is_empty() {
        return Err(RecipeValidationError::EmptyIngredients);
    }
    if ingredients.iter().any(|line| line.amount < 1) {
        return Err(RecipeValidationError::InvalidAmount);
    }
    let distinct: HashSet<Uuid> = ingredients.iter().map(|line| line.id).collect();
    if distinct.len() != ingredients.len() {
        return Err(RecipeValidationError::DuplicateIngredient);
    }

    let distinct_tags: HashSet<Uuid> = tag_ids.iter().copied().collect();
    if tag_ids.is_empty()
        || distinct_tags.len() != tag_ids.len()
        || tag_ids.len() as i64 > catalog_tag_count
    {
        return Err(RecipeValidationError::InvalidTagSelection {
            catalog_size: catalog_tag_count,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: Uuid, amount: i32) -> RecipeIngredientRequest {
        RecipeIngredientRequest { id, amount }
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn accepts_well_formed_recipe() {
        let tags = ids(2);
        let ingredients = vec![line(Uuid::new_v4(), 200), line(Uuid::new_v4(), 1)];
        assert_eq!(validate_recipe("Pancakes", 20, &ingredients, &tags, 5), Ok(()));
    }

    #[test]
    fn rejects_empty_ingredients() {
        assert_eq!(
            validate_recipe("Pancakes", 20, &[], &ids(1), 5),
            Err(RecipeValidationError::EmptyIngredients)
        );
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        for amount in [0, -3] {
            let ingredients = vec![line(Uuid::new_v4(), amount)];
            assert_eq!(
                validate_recipe("Pancakes", 20, &ingredients, &ids(1), 5),
                Err(RecipeValidationError::InvalidAmount)
            );
        }
    }

    #[test]
    fn rejects_repeated_ingredient() {
        let id = Uuid::new_v4();
        let ingredients = vec![line(id, 100), line(id, 50)];
        assert_eq!(
            validate_recipe("Pancakes", 20, &ingredients, &ids(1), 5),
            Err(RecipeValidationError::DuplicateIngredient)
        );
    }

    #[test]
    fn rejects_bad_tag_selections() {
        let ingredients = vec![line(Uuid::new_v4(), 100)];

        // empty
        assert!(matches!(
            validate_recipe("Pancakes", 20, &ingredients, &[], 5),
            Err(RecipeValidationError::InvalidTagSelection { .. })
        ));

        // repeated tag
        let tag = Uuid::new_v4();
        assert!(matches!(
            validate_recipe("Pancakes", 20, &ingredients, &[tag, tag], 5),
            Err(RecipeValidationError::InvalidTagSelection { .. })
        ));

        // more tags than the catalog holds
        assert!(matches!(
            validate_recipe("Pancakes", 20, &ingredients, &ids(3), 2),
            Err(RecipeValidationError::InvalidTagSelection { .. })
        ));
    }

    #[test]
    fn rejects_oversized_name() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_recipe(&name, 20, &[line(Uuid::new_v4(), 1)], &ids(1), 5),
            Err(RecipeValidationError::NameTooLong)
        );

        // exactly at the limit is fine
        let name = "x".repeat(MAX_NAME_LEN);
        assert_eq!(
            validate_recipe(&name, 20, &[line(Uuid::new_v4(), 1)], &ids(1), 5),
            Ok(())
        );
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            validate_recipe("   ", 20, &[line(Uuid::new_v4(), 1)], &ids(1), 5),
            Err(RecipeValidationError::EmptyName)
        );
    }

    #[test]
    fn rejects_non_positive_cooking_time() {
        for t in [0, -1] {
            assert_eq!(
                validate_recipe("Pancakes", t, &[line(Uuid::new_v4(), 1)], &ids(1), 5),
                Err(RecipeValidationError::InvalidCookingTime)
            );
        }
    }
}
