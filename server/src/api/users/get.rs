use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::{follows, users};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    /// Whether the requesting user follows this author
    pub is_subscribed: bool,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user profile", body = UserProfile),
        (status = 404, description = "User not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    AuthUser(viewer): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let (user_id, username): (Uuid, String) = users::table
        .find(id)
        .select((users::id, users::username))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let is_subscribed: bool = diesel::select(diesel::dsl::exists(
        follows::table
            .filter(follows::follower_id.eq(viewer.id))
            .filter(follows::author_id.eq(user_id)),
    ))
    .get_result(&mut conn)?;

    Ok((
        StatusCode::OK,
        Json(UserProfile {
            id: user_id,
            username,
            is_subscribed,
        }),
    ))
}
