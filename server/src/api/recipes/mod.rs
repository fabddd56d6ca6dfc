pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod list;
pub mod shopping_cart;
pub mod update;
pub mod validate;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::Queryable;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/download-shopping-cart",
            get(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            axum::routing::post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping-cart",
            axum::routing::post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

/// Compact recipe view returned by the favorite/cart toggles and author
/// previews.
#[derive(Debug, Clone, Serialize, Queryable, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download_shopping_cart::download_shopping_cart,
    ),
    components(schemas(
        RecipeSummary,
        create::CreateRecipeRequest,
        validate::RecipeIngredientRequest,
        get::RecipeResponse,
        get::AuthorSummary,
        get::RecipeIngredientView,
        list::ListRecipesResponse,
        list::PaginationMetadata,
        update::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;
