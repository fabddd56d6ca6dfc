use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
    pub username: String,
}

#[utoipa::path(
    get,
    path = "/api/test",
    tag = "testing",
    responses(
        (status = 200, description = "Authenticated pong", body = PingResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn ping(AuthUser(user): AuthUser) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(PingResponse {
            message: "pong".to_string(),
            username: user.username,
        }),
    )
}
