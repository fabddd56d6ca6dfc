use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeTag};
use crate::schema::{recipe_ingredients, recipe_tags, recipes, tags};

use super::get::{fetch_recipe_response, RecipeResponse};
use super::validate::{validate_recipe, RecipeIngredientRequest};

fn default_cooking_time() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    /// Opaque image path; the server never inspects it
    pub image: String,
    pub text: String,
    #[serde(default = "default_cooking_time")]
    pub cooking_time: i32,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<RecipeIngredientRequest>,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::api::ErrorResponse),
        (status = 404, description = "Unknown ingredient or tag", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let catalog_tag_count: i64 = tags::table.count().get_result(&mut conn)?;

    validate_recipe(
        &request.name,
        request.cooking_time,
        &request.ingredients,
        &request.tags,
        catalog_tag_count,
    )?;

    // Recipe row, ingredient lines, and tag associations land together or
    // not at all.
    let recipe_id: Uuid = conn.transaction::<_, ApiError, _>(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: request.name.trim(),
            image: &request.image,
            text: &request.text,
            cooking_time: request.cooking_time,
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        insert_recipe_lines(conn, recipe_id, &request.ingredients, &request.tags)?;

        Ok(recipe_id)
    })?;

    let response = fetch_recipe_response(&mut conn, user.id, recipe_id)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Bulk-insert the ingredient lines and tag associations of a recipe.
/// Shared with the update path, which calls it after clearing the old sets.
pub(super) fn insert_recipe_lines(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ingredients: &[RecipeIngredientRequest],
    tag_ids: &[Uuid],
) -> Result<(), diesel::result::Error> {
    let lines: Vec<NewRecipeIngredient> = ingredients
        .iter()
        .map(|line| NewRecipeIngredient {
            recipe_id,
            ingredient_id: line.id,
            amount: line.amount,
        })
        .collect();

    diesel::insert_into(recipe_ingredients::table)
        .values(&lines)
        .execute(conn)?;

    let associations: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();

    diesel::insert_into(recipe_tags::table)
        .values(&associations)
        .execute(conn)?;

    Ok(())
}
