use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::ConversationModel;
use crate::response::ApiResponse;
use crate::services::conversation::{ConversationService, InboxEntry};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: i32,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    pub created_at: String,
}

impl From<ConversationModel> for MessageResponse {
    fn from(row: ConversationModel) -> Self {
        Self {
            id: row.id,
            sender: row.sender,
            receiver: row.receiver,
            message: row.message,
            created_at: row.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InboxEntryResponse {
    /// The other party of the thread
    pub counterpart: String,
    /// Body of the pair's most recent message
    pub last_message: String,
    /// Timestamp of the pair's most recent message
    pub last_activity: String,
}

impl From<InboxEntry> for InboxEntryResponse {
    fn from(entry: InboxEntry) -> Self {
        Self {
            counterpart: entry.counterpart,
            last_message: entry.last_message,
            last_activity: entry.last_activity.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// Message body (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Inbox: one entry per counterpart, latest activity first", body = [InboxEntryResponse]),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "conversations"
)]
pub async fn inbox(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = ConversationService::new(db);
    let entries = service.inbox(&auth_user.username).await?;
    let entries: Vec<InboxEntryResponse> =
        entries.into_iter().map(InboxEntryResponse::from).collect();

    Ok(ApiResponse::ok(entries))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{username}",
    security(("jwt_token" = [])),
    params(("username" = String, Path, description = "Counterpart username")),
    responses(
        (status = 200, description = "Full thread with the counterpart, oldest first", body = [MessageResponse]),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Counterpart not found", body = AppError),
    ),
    tag = "conversations"
)]
pub async fn get_thread(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let service = ConversationService::new(db);
    let rows = service.thread(&auth_user.username, &username).await?;
    let messages: Vec<MessageResponse> = rows.into_iter().map(MessageResponse::from).collect();

    Ok(ApiResponse::ok(messages))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations/{username}",
    security(("jwt_token" = [])),
    params(("username" = String, Path, description = "Receiver username")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Receiver not found", body = AppError),
    ),
    tag = "conversations"
)]
pub async fn send_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(username): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ConversationService::new(db);
    let row = service
        .send_message(&auth_user.username, &username, &payload.message)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::from(row)))
}
