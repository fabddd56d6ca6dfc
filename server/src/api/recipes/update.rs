use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::{recipe_ingredients, recipe_tags, recipes, tags};

use super::create::insert_recipe_lines;
use super::get::{fetch_recipe_response, RecipeResponse};
use super::validate::{validate_recipe, RecipeIngredientRequest};

/// Update payload carries the full desired state: the stored tag and
/// ingredient sets are replaced wholesale, not diffed.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<Uuid>,
    pub ingredients: Vec<RecipeIngredientRequest>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::api::ErrorResponse),
        (status = 403, description = "Not the recipe author", body = crate::api::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let author_id: Option<Uuid> = recipes::table
        .find(id)
        .select(recipes::author_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    if author_id != Some(user.id) {
        return Err(ApiError::Forbidden(
            "Only the author may edit a recipe".to_string(),
        ));
    }

    let catalog_tag_count: i64 = tags::table.count().get_result(&mut conn)?;

    validate_recipe(
        &request.name,
        request.cooking_time,
        &request.ingredients,
        &request.tags,
        catalog_tag_count,
    )?;

    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(recipes::table.find(id))
            .set((
                recipes::name.eq(request.name.trim()),
                recipes::image.eq(&request.image),
                recipes::text.eq(&request.text),
                recipes::cooking_time.eq(request.cooking_time),
            ))
            .execute(conn)?;

        // Clear-then-reinsert: the payload is the full desired state, so
        // replacing the sets is sufficient and sidesteps diffing.
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)))
            .execute(conn)?;
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id))).execute(conn)?;

        insert_recipe_lines(conn, id, &request.ingredients, &request.tags)?;

        Ok(())
    })?;

    let response = fetch_recipe_response(&mut conn, user.id, id)?;
    Ok((StatusCode::OK, Json(response)))
}
