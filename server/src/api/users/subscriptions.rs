use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::recipes::RecipeSummary;
use crate::auth::AuthUser;
use crate::db::{DbConn, DbPool};
use crate::error::ApiError;
use crate::schema::{follows, recipes, users};

const DEFAULT_RECIPES_LIMIT: i64 = 3;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubscriptionsParams {
    /// Recipes shown per followed author (default: 3)
    pub recipes_limit: Option<i64>,
}

/// A followed author with a capped preview of their newest recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FollowedAuthor {
    pub id: Uuid,
    pub username: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by this author, not just the preview
    pub recipes_count: i64,
}

/// Build the subscription view of one author: a newest-first preview slice
/// plus the total count.
pub(super) fn followed_author_view(
    conn: &mut DbConn,
    author_id: Uuid,
    username: String,
    recipes_limit: i64,
) -> Result<FollowedAuthor, ApiError> {
    let preview: Vec<RecipeSummary> = recipes::table
        .filter(recipes::author_id.eq(Some(author_id)))
        .order(recipes::pub_date.desc())
        .limit(recipes_limit)
        .select((recipes::id, recipes::name, recipes::image, recipes::cooking_time))
        .load(conn)?;

    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(Some(author_id)))
        .count()
        .get_result(conn)?;

    Ok(FollowedAuthor {
        id: author_id,
        username,
        is_subscribed: true,
        recipes: preview,
        recipes_count,
    })
}

pub(super) fn clamp_recipes_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_RECIPES_LIMIT).clamp(0, 100)
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionsParams),
    responses(
        (status = 200, description = "Authors the caller follows", body = [FollowedAuthor]),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SubscriptionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let recipes_limit = clamp_recipes_limit(params.recipes_limit);

    let mut conn = pool.get()?;

    let authors: Vec<(Uuid, String)> = follows::table
        .inner_join(users::table.on(users::id.eq(follows::author_id)))
        .filter(follows::follower_id.eq(user.id))
        .order(users::username.asc())
        .select((users::id, users::username))
        .load(&mut conn)?;

    let mut subscriptions = Vec::with_capacity(authors.len());
    for (author_id, username) in authors {
        subscriptions.push(followed_author_view(
            &mut conn,
            author_id,
            username,
            recipes_limit,
        )?);
    }

    Ok((StatusCode::OK, Json(subscriptions)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipes_limit_defaults_to_three() {
        assert_eq!(clamp_recipes_limit(None), 3);
    }

    #[test]
    fn recipes_limit_is_clamped() {
        assert_eq!(clamp_recipes_limit(Some(10)), 10);
        assert_eq!(clamp_recipes_limit(Some(-5)), 0);
        assert_eq!(clamp_recipes_limit(Some(10_000)), 100);
    }
}
