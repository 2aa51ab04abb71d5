use crate::error::AppResult;
use crate::models::User;
use crate::utils::hash_password;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::env;

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub mis: String,
}

impl BootstrapAdminConfig {
    pub fn from_env() -> Option<Self> {
        let enabled = env::var("BOOTSTRAP_ADMIN_ENABLED")
            .ok()
            .map(|v| v.trim().to_ascii_lowercase())
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on"))
            .unwrap_or(false);

        if !enabled {
            return None;
        }

        Some(Self {
            username: env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?,
            password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?,
            first_name: env::var("BOOTSTRAP_ADMIN_FIRST_NAME")
                .unwrap_or_else(|_| "Admin".to_string()),
            last_name: env::var("BOOTSTRAP_ADMIN_LAST_NAME").unwrap_or_else(|_| "".to_string()),
            mis: env::var("BOOTSTRAP_ADMIN_MIS").unwrap_or_else(|_| "mis".to_string()),
        })
    }
}

/// Seed the first admin at startup. Signup only ever writes the "user" role,
/// and claims are routed to admins by place of responsibility, so a fresh
/// deployment needs this to have any admin at all:
/// - if any admin exists already: do nothing
/// - if the configured username exists: promote it
/// - otherwise create the account with the admin role
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection) -> AppResult<()> {
    let Some(cfg) = BootstrapAdminConfig::from_env() else {
        return Ok(());
    };

    let admin_exists = User::find()
        .filter(crate::models::user::Column::Role.eq("admin"))
        .one(db)
        .await?
        .is_some();
    if admin_exists {
        return Ok(());
    }

    let existing = User::find_by_id(cfg.username.clone()).one(db).await?;
    let now = chrono::Utc::now().naive_utc();

    if let Some(user) = existing {
        let mut active: crate::models::user::ActiveModel = user.into();
        active.role = sea_orm::ActiveValue::Set("admin".to_string());
        active.updated_at = sea_orm::ActiveValue::Set(now);
        active.update(db).await?;
        tracing::info!("Promoted '{}' to admin", cfg.username);
        return Ok(());
    }

    let password_hash = hash_password(&cfg.password)?;

    let new_user = crate::models::user::ActiveModel {
        username: sea_orm::ActiveValue::Set(cfg.username.clone()),
        first_name: sea_orm::ActiveValue::Set(cfg.first_name),
        last_name: sea_orm::ActiveValue::Set(cfg.last_name),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        mis: sea_orm::ActiveValue::Set(cfg.mis),
        role: sea_orm::ActiveValue::Set("admin".to_string()),
        created_at: sea_orm::ActiveValue::Set(now),
        updated_at: sea_orm::ActiveValue::Set(now),
    };

    new_user.insert(db).await?;
    tracing::info!("Created bootstrap admin '{}'", cfg.username);
    Ok(())
}
