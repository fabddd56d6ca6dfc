use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::recipes;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted successfully"),
        (status = 403, description = "Not the recipe author", body = crate::api::ErrorResponse),
        (status = 404, description = "Recipe not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
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
            "Only the author may delete a recipe".to_string(),
        ));
    }

    // Cascades take the ingredient lines, tag associations, favorites, and
    // cart entries with it.
    diesel::delete(recipes::table.find(id)).execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
