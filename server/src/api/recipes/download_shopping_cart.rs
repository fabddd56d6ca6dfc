use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::{cart_entries, ingredients, recipe_ingredients};
use crate::shopping_list::{self, SHOPPING_LIST_FILENAME};

#[utoipa::path(
    get,
    path = "/api/recipes/download-shopping-cart",
    tag = "recipes",
    responses(
        (status = 200, description = "Aggregated shopping list (shopping_list.txt)", content_type = "text/plain"),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    // Every ingredient line of every recipe in the caller's cart, in one
    // query; bucketing and summing happen in shopping_list::aggregate.
    let cart_recipes = cart_entries::table
        .filter(cart_entries::user_id.eq(user.id))
        .select(cart_entries::recipe_id);

    let rows: Vec<(String, String, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(&mut conn)?;

    let totals = shopping_list::aggregate(rows);
    let body = shopping_list::render(&totals);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
        )
        .body(Body::from(body))
        .unwrap();

    Ok(response)
}
