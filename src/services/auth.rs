use crate::{
    error::{AppError, AppResult},
    models::{User, UserModel},
    utils::{encode_token, hash_password, verify_password},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, SqlErr};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new account with the "user" role.
    ///
    /// Uniqueness rides the users primary key: two concurrent signups with
    /// the same username race on a single-row insert, the loser gets the
    /// unique-violation mapped to Conflict and nothing is written.
    pub async fn signup(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        mis: &str,
    ) -> AppResult<UserModel> {
        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = crate::models::user::ActiveModel {
            username: sea_orm::ActiveValue::Set(username.to_string()),
            first_name: sea_orm::ActiveValue::Set(first_name.to_string()),
            last_name: sea_orm::ActiveValue::Set(last_name.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            mis: sea_orm::ActiveValue::Set(mis.to_string()),
            role: sea_orm::ActiveValue::Set("user".to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        match new_user.insert(&self.db).await {
            Ok(user) => Ok(user),
            Err(e) => {
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    return Err(AppError::Conflict("Username already exists".to_string()));
                }
                Err(e.into())
            }
        }
    }

    /// Login user. Returns (user_model, token).
    ///
    /// Unknown username and wrong password both map to Unauthorized so the
    /// response does not reveal which one it was.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = User::find_by_id(username.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Unauthorized);
        }

        let token = encode_token(&user.username, &user.role)?;
        Ok((user, token))
    }

    /// Fetch a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<UserModel> {
        User::find_by_id(username.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}
