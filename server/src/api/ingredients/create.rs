use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub measurement_unit: String,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = CreateIngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 400, description = "Invalid request", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_ingredient(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    let unit = req.measurement_unit.trim();

    if name.is_empty() || name.chars().count() > 200 {
        return Err(ApiError::Validation(
            "Ingredient name must be 1-200 characters".to_string(),
        ));
    }
    if unit.is_empty() || unit.chars().count() > 200 {
        return Err(ApiError::Validation(
            "Measurement unit must be 1-200 characters".to_string(),
        ));
    }

    let mut conn = pool.get()?;

    let new_ingredient = NewIngredient {
        name,
        measurement_unit: unit,
    };

    let ingredient: Ingredient = diesel::insert_into(ingredients::table)
        .values(&new_ingredient)
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}
