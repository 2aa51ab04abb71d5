use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::ItemModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::comment::CommentService;
use crate::services::conversation::ConversationService;
use crate::services::item::{ItemService, NewItem};
use crate::services::upload::UploadService;
use crate::utils::render_markdown;
use axum::{
    extract::{Multipart, Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub description: String,
    /// Sanitized HTML rendering of the description
    pub description_html: String,
    pub category: String,
    pub report_type: String,
    pub place_of_responsibility: String,
    pub username: String,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<ItemModel> for ItemResponse {
    fn from(item: ItemModel) -> Self {
        Self {
            id: item.id,
            description_html: render_markdown(&item.description),
            description: item.description,
            category: item.category,
            report_type: item.report_type,
            place_of_responsibility: item.place_of_responsibility,
            username: item.username,
            image: item.image,
            created_at: item.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetailResponse {
    pub id: i32,
    pub description: String,
    /// Sanitized HTML rendering of the description
    pub description_html: String,
    pub category: String,
    pub report_type: String,
    pub place_of_responsibility: String,
    pub username: String,
    pub image: Option<String>,
    pub created_at: String,
    pub locations: Vec<String>,
    pub comments: Vec<crate::handlers::comment::CommentResponse>,
}

impl ItemDetailResponse {
    fn new(
        item: ItemModel,
        locations: Vec<String>,
        comments: Vec<crate::handlers::comment::CommentResponse>,
    ) -> Self {
        let item = ItemResponse::from(item);
        Self {
            id: item.id,
            description: item.description,
            description_html: item.description_html,
            category: item.category,
            report_type: item.report_type,
            place_of_responsibility: item.place_of_responsibility,
            username: item.username,
            image: item.image,
            created_at: item.created_at,
            locations,
            comments,
        }
    }
}

/// Accumulated multipart fields of an item report form.
#[derive(Default)]
struct ItemForm {
    description: Option<String>,
    category: Option<String>,
    report_type: Option<String>,
    responsibility: Option<String>,
    locations: Vec<String>,
    image: Option<(String, Vec<u8>)>,
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    security(("jwt_token" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Item reported successfully", body = ItemDetailResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 413, description = "Image too large", body = AppError),
    ),
    tag = "items"
)]
pub async fn create_item(
    Extension(db): Extension<DatabaseConnection>,
    Extension(upload_config): Extension<crate::config::upload::UploadConfig>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_item_form(multipart).await?;

    let description = require_field(form.description, "description")?;
    let category = require_field(form.category, "category")?;
    let report_type = require_field(form.report_type, "report_type")?;
    let responsibility = require_field(form.responsibility, "responsibility")?;

    // A photo with a disallowed extension is skipped, not an error; the item
    // is stored without an image. Oversize is a hard failure either way.
    let image = match form.image {
        Some((name, data)) => {
            if data.len() > upload_config.max_size {
                return Err(AppError::PayloadTooLarge);
            }
            if UploadService::allowed_file(&name) {
                Some(UploadService::save_image(&upload_config, &name, &data).await?)
            } else {
                tracing::debug!("Skipping image '{}': extension not allowed", name);
                None
            }
        }
        None => None,
    };

    let service = ItemService::new(db);
    let (item, locations) = service
        .create(
            NewItem {
                description,
                category,
                report_type,
                place_of_responsibility: responsibility,
                username: auth_user.username,
                image,
            },
            form.locations,
        )
        .await?;

    let detail = ItemDetailResponse::new(
        item,
        locations.into_iter().map(|l| l.location).collect(),
        vec![],
    );

    Ok(ApiResponse::with_message(
        detail,
        "Item reported successfully".to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Paginated item listing, newest first", body = PaginatedResponse<ItemResponse>),
    ),
    tag = "items"
)]
pub async fn list_items(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = ItemService::new(db);
    let (items, total) = service.list(page, per_page).await?;
    let items = items.into_iter().map(ItemResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item with its locations and comments", body = ItemDetailResponse),
        (status = 404, description = "Item not found", body = AppError),
    ),
    tag = "items"
)]
pub async fn get_item(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(db.clone());
    let item = service.get(id).await?;
    let locations = service.locations_of(id).await?;

    let comment_service = CommentService::new(db);
    let comments = comment_service.list_by_item(id).await?;

    let detail = ItemDetailResponse::new(
        item,
        locations.into_iter().map(|l| l.location).collect(),
        comments
            .into_iter()
            .map(crate::handlers::comment::CommentResponse::from)
            .collect(),
    );

    Ok(ApiResponse::ok(detail))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/claim",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Claim submitted", body = crate::handlers::conversation::MessageResponse),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Item not found", body = AppError),
    ),
    tag = "items"
)]
pub async fn claim_item(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ConversationService::new(db);
    let row = service.claim_item(id, &auth_user.username).await?;

    Ok(ApiResponse::with_message(
        crate::handlers::conversation::MessageResponse::from(row),
        "Claim request submitted".to_string(),
    ))
}

async fn read_item_form(mut multipart: Multipart) -> AppResult<ItemForm> {
    let mut form = ItemForm::default();

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        match field.name() {
            Some("description") => form.description = Some(read_text(field).await?),
            Some("category") => form.category = Some(read_text(field).await?),
            Some("report_type") => form.report_type = Some(read_text(field).await?),
            Some("responsibility") => form.responsibility = Some(read_text(field).await?),
            Some("location") => {
                let value = read_text(field).await?;
                if !value.trim().is_empty() {
                    form.locations.push(value);
                }
            }
            Some("image") => {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(map_multipart_error)?;
                if let Some(name) = file_name {
                    if !data.is_empty() {
                        form.image = Some((name, data.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field.text().await.map_err(map_multipart_error)
}

/// A body that blows the request limit surfaces mid-read as a multipart
/// error; that case is an oversize upload, not a malformed form.
fn map_multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Failed to read form: {err}"))
    }
}

fn require_field(value: Option<String>, name: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
