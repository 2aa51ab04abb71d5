use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single directed message. A logical conversation between two users is the
/// set of all rows whose `{sender, receiver}` equals that unordered pair;
/// there is no separate conversation entity. Rows are immutable once written,
/// and `id` serves as the tie-breaking sequence when timestamps collide.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub sender: String,
    pub receiver: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Sender",
        to = "super::user::Column::Username"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Receiver",
        to = "super::user::Column::Username"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}
