use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::schema::{cart_entries, favorites, recipe_tags, recipes, tags};

use super::RecipeSummary;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Comma-separated tag slugs; a recipe matches if it carries any of them
    pub tags: Option<String>,
    /// When true, only recipes the caller has favorited
    pub is_favorited: Option<bool>,
    /// When true, only recipes in the caller's shopping cart
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items matching the filters
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationMetadata,
}

#[derive(Queryable)]
struct RecipeForList {
    id: Uuid,
    name: String,
    image: String,
    cooking_time: i32,
    /// Total count of all matching rows (from window function)
    total_count: i64,
}

fn parse_slugs(tags_param: &str) -> Vec<&str> {
    tags_param
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Filtered recipe list, newest first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = pool.get()?;

    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(Some(author)));
    }

    let slugs = params.tags.as_deref().map(parse_slugs).unwrap_or_default();
    if !slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(slugs))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if params.is_favorited == Some(true) {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user.id))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favorited));
    }

    if params.is_in_shopping_cart == Some(true) {
        let in_cart = cart_entries::table
            .filter(cart_entries::user_id.eq(user.id))
            .select(cart_entries::recipe_id);
        query = query.filter(recipes::id.eq_any(in_cart));
    }

    // COUNT(*) OVER() carries the pre-LIMIT total on every row
    let results: Vec<RecipeForList> = query
        .order(recipes::pub_date.desc())
        .select((
            recipes::id,
            recipes::name,
            recipes::image,
            recipes::cooking_time,
            sql::<BigInt>("COUNT(*) OVER()"),
        ))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)?;

    let total = results.first().map(|r| r.total_count).unwrap_or(0);

    let summaries = results
        .into_iter()
        .map(|r| RecipeSummary {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes: summaries,
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_slugs() {
        assert_eq!(parse_slugs("breakfast,dinner"), vec!["breakfast", "dinner"]);
        assert_eq!(parse_slugs(" breakfast , dinner "), vec!["breakfast", "dinner"]);
    }

    #[test]
    fn drops_empty_slug_segments() {
        assert_eq!(parse_slugs("breakfast,,dinner,"), vec!["breakfast", "dinner"]);
        assert!(parse_slugs("").is_empty());
        assert!(parse_slugs(" , ").is_empty());
    }
}
