use crate::{
    error::{AppError, AppResult},
    models::{comment, Comment, CommentModel, Item},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Comments of an item, oldest first. Ties on the timestamp resolve by
    /// insertion order.
    pub async fn list_by_item(&self, item_id: i32) -> AppResult<Vec<CommentModel>> {
        let comments = Comment::find()
            .filter(comment::Column::ItemId.eq(item_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(comments)
    }

    /// Append a comment to an existing item.
    pub async fn create(
        &self,
        item_id: i32,
        username: &str,
        content: &str,
    ) -> AppResult<CommentModel> {
        Item::find_by_id(item_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now().naive_utc();

        let new_comment = comment::ActiveModel {
            item_id: sea_orm::ActiveValue::Set(item_id),
            username: sea_orm::ActiveValue::Set(username.to_string()),
            content: sea_orm::ActiveValue::Set(content.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let comment = new_comment.insert(&self.db).await?;
        Ok(comment)
    }
}
