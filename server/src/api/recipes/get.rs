use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{DbConn, DbPool};
use crate::error::ApiError;
use crate::models::{Recipe, Tag};
use crate::schema::{
    cart_entries, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
}

/// One resolved ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Queryable, ToSchema)]
pub struct RecipeIngredientView {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    /// None when the author account has been deleted
    pub author: Option<AuthorSummary>,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Assemble the full read view of a recipe as seen by `viewer_id`.
/// Shared by the get/create/update handlers so a write responds with the
/// same shape a subsequent read would produce.
pub(crate) fn fetch_recipe_response(
    conn: &mut DbConn,
    viewer_id: Uuid,
    recipe_id: Uuid,
) -> Result<RecipeResponse, ApiError> {
    let recipe: Recipe = find_recipe(conn, recipe_id)?;

    let author = match recipe.author_id {
        Some(author_id) => users::table
            .find(author_id)
            .select((users::id, users::username))
            .first::<(Uuid, String)>(conn)
            .optional()?
            .map(|(id, username)| AuthorSummary { id, username }),
        None => None,
    };

    let recipe_tag_list: Vec<Tag> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq(recipe.id))
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)?;

    let ingredient_lines: Vec<RecipeIngredientView> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(recipe.id))
        .order(ingredients::name.asc())
        .select((
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    let is_favorited: bool = diesel::select(diesel::dsl::exists(
        favorites::table
            .filter(favorites::user_id.eq(viewer_id))
            .filter(favorites::recipe_id.eq(recipe.id)),
    ))
    .get_result(conn)?;

    let is_in_shopping_cart: bool = diesel::select(diesel::dsl::exists(
        cart_entries::table
            .filter(cart_entries::user_id.eq(viewer_id))
            .filter(cart_entries::recipe_id.eq(recipe.id)),
    ))
    .get_result(conn)?;

    Ok(RecipeResponse {
        id: recipe.id,
        author,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
        tags: recipe_tag_list,
        ingredients: ingredient_lines,
        is_favorited,
        is_in_shopping_cart,
    })
}

fn find_recipe(conn: &mut DbConn, recipe_id: Uuid) -> Result<Recipe, ApiError> {
    recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "The recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let response = fetch_recipe_response(&mut conn, user.id, id)?;
    Ok((StatusCode::OK, Json(response)))
}
