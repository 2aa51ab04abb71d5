use crate::error::{AppError, AppResult};
use crate::handlers::item::ItemResponse;
use crate::middleware::auth::{require_admin, AuthUser};
use crate::response::ApiResponse;
use crate::services::item::ItemService;
use axum::{response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/v1/admin/claims",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Items routed to this admin's place of responsibility", body = [ItemResponse]),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admin"
)]
pub async fn list_routed_claims(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&auth_user)?;

    // Routing rule: an item lands on the admin whose username matches its
    // place of responsibility.
    let service = ItemService::new(db);
    let items = service.list_by_responsibility(&auth_user.username).await?;
    let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();

    Ok(ApiResponse::ok(items))
}
