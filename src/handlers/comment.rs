use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::CommentModel;
use crate::response::ApiResponse;
use crate::services::comment::CommentService;
use crate::utils::render_markdown;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub item_id: i32,
    pub username: String,
    pub content: String,
    /// Sanitized HTML rendering of the content
    pub content_html: String,
    pub created_at: String,
}

impl From<CommentModel> for CommentResponse {
    fn from(comment: CommentModel) -> Self {
        Self {
            id: comment.id,
            item_id: comment.item_id,
            username: comment.username,
            content_html: render_markdown(&comment.content),
            content: comment.content,
            created_at: comment.created_at.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    /// Comment text (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/comments",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Item id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Item not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(item_id): Path<i32>,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CommentService::new(db);
    let comment = service
        .create(item_id, &auth_user.username, &payload.content)
        .await?;

    Ok(ApiResponse::ok(CommentResponse::from(comment)))
}
