use axum::{
    extract::{Path, Query, State},
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
use crate::models::NewFollow;
use crate::schema::{follows, users};

use super::subscriptions::{clamp_recipes_limit, followed_author_view, FollowedAuthor, SubscriptionsParams};

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "Author ID"),
        SubscriptionsParams
    ),
    responses(
        (status = 201, description = "Subscribed", body = FollowedAuthor),
        (status = 400, description = "Cannot subscribe to yourself", body = crate::api::ErrorResponse),
        (status = 409, description = "Already subscribed", body = crate::api::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Query(params): Query<SubscriptionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    // Rejected before any lookup: self-follow can never succeed.
    if user.id == id {
        return Err(ApiError::Validation(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    let mut conn = pool.get()?;

    let (author_id, username): (Uuid, String) = users::table
        .find(id)
        .select((users::id, users::username))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let already: bool = diesel::select(diesel::dsl::exists(
        follows::table
            .filter(follows::follower_id.eq(user.id))
            .filter(follows::author_id.eq(author_id)),
    ))
    .get_result(&mut conn)?;

    if already {
        return Err(ApiError::Conflict(
            "Already subscribed to this author".to_string(),
        ));
    }

    diesel::insert_into(follows::table)
        .values(&NewFollow {
            follower_id: user.id,
            author_id,
        })
        .execute(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Conflict("Already subscribed to this author".to_string()),
            other => other.into(),
        })?;

    let view = followed_author_view(
        &mut conn,
        author_id,
        username,
        clamp_recipes_limit(params.recipes_limit),
    )?;

    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "users",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 404, description = "Not subscribed to this author", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        follows::table
            .filter(follows::follower_id.eq(user.id))
            .filter(follows::author_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::NotFound(
            "Not subscribed to this author".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
