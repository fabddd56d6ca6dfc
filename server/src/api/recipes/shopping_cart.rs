use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::NewCartEntry;
use crate::schema::{cart_entries, recipes};

use super::RecipeSummary;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe added to the shopping cart", body = RecipeSummary),
        (status = 409, description = "Already in the shopping cart", body = crate::api::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let summary: RecipeSummary = recipes::table
        .find(id)
        .select((recipes::id, recipes::name, recipes::image, recipes::cooking_time))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let already: bool = diesel::select(diesel::dsl::exists(
        cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .filter(cart_entries::recipe_id.eq(id)),
    ))
    .get_result(&mut conn)?;

    if already {
        return Err(ApiError::Conflict(
            "Recipe is already in the shopping cart".to_string(),
        ));
    }

    diesel::insert_into(cart_entries::table)
        .values(&NewCartEntry {
            user_id: user.id,
            recipe_id: id,
        })
        .execute(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Conflict("Recipe is already in the shopping cart".to_string()),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping-cart",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 404, description = "Recipe is not in the shopping cart", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .filter(cart_entries::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::NotFound(
            "Recipe is not in the shopping cart".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
