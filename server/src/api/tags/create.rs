use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewTag, Tag};
use crate::schema::tags;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
    /// Hex color, e.g. "#49B64E". Stored uppercase.
    pub color: String,
    pub slug: String,
}

/// Check the `#RRGGBB` shape and return the canonical uppercase form.
fn normalize_color(color: &str) -> Option<String> {
    let digits = color.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_uppercase()))
}

fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid request", body = crate::api::ErrorResponse),
        (status = 409, description = "Name, color, or slug already taken", body = crate::api::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::api::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tag(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > 200 {
        return Err(ApiError::Validation(
            "Tag name must be 1-200 characters".to_string(),
        ));
    }

    let color = normalize_color(&req.color).ok_or_else(|| {
        ApiError::Validation("Color must be '#' followed by six hex digits".to_string())
    })?;

    if !valid_slug(&req.slug) {
        return Err(ApiError::Validation(
            "Slug may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }

    let mut conn = pool.get()?;

    let new_tag = NewTag {
        name,
        color: &color,
        slug: &req.slug,
    };

    let tag: Tag = diesel::insert_into(tags::table)
        .values(&new_tag)
        .returning(Tag::as_returning())
        .get_result(&mut conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ApiError::Conflict("Tag name, color, or slug already exists".to_string()),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_color_to_uppercase() {
        assert_eq!(normalize_color("#49b64e").as_deref(), Some("#49B64E"));
        assert_eq!(normalize_color("#ABCDEF").as_deref(), Some("#ABCDEF"));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert_eq!(normalize_color("49B64E"), None);
        assert_eq!(normalize_color("#49B64"), None);
        assert_eq!(normalize_color("#49B64EF"), None);
        assert_eq!(normalize_color("#49B64G"), None);
        assert_eq!(normalize_color(""), None);
    }

    #[test]
    fn slug_charset() {
        assert!(valid_slug("breakfast"));
        assert!(valid_slug("low-carb_2"));
        assert!(!valid_slug(""));
        assert!(!valid_slug("with space"));
        assert!(!valid_slug("naïve"));
    }
}
