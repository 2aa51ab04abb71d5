use crate::{
    error::{AppError, AppResult},
    models::{conversation, Conversation, ConversationModel, Item, User},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// One inbox line: the counterpart and the latest message exchanged with
/// them, in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxEntry {
    pub counterpart: String,
    pub last_message: String,
    pub last_activity: chrono::NaiveDateTime,
}

pub struct ConversationService {
    db: DatabaseConnection,
}

impl ConversationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Claiming an item seeds a conversation with its reporter: one row with
    /// a fixed template body, sender = claimer, receiver = reporter. There is
    /// no claim entity beyond that first message.
    pub async fn claim_item(&self, item_id: i32, claimer: &str) -> AppResult<ConversationModel> {
        let item = Item::find_by_id(item_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        self.append(claimer, &item.username, &claim_message(item_id))
            .await
    }

    /// Append a message to the thread with `receiver`. The receiver must
    /// exist; the next thread read reflects the row (no cache anywhere).
    pub async fn send_message(
        &self,
        sender: &str,
        receiver: &str,
        body: &str,
    ) -> AppResult<ConversationModel> {
        User::find_by_id(receiver.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        self.append(sender, receiver, body).await
    }

    /// Full bidirectional thread between two users, oldest first. Equal
    /// timestamps resolve by insertion order (ascending id).
    pub async fn thread(
        &self,
        viewer: &str,
        counterpart: &str,
    ) -> AppResult<Vec<ConversationModel>> {
        User::find_by_id(counterpart.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let rows = Conversation::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(conversation::Column::Sender.eq(viewer))
                            .add(conversation::Column::Receiver.eq(counterpart)),
                    )
                    .add(
                        Condition::all()
                            .add(conversation::Column::Sender.eq(counterpart))
                            .add(conversation::Column::Receiver.eq(viewer)),
                    ),
            )
            .order_by_asc(conversation::Column::CreatedAt)
            .order_by_asc(conversation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Inbox view: one entry per counterpart, carrying that pair's latest
    /// message, ordered by latest activity descending.
    ///
    /// One query pulls every row touching the viewer in `(created_at, id)`
    /// descending order; one in-memory pass groups by counterpart. No
    /// per-counterpart round trips and no dialect-specific aggregation.
    pub async fn inbox(&self, viewer: &str) -> AppResult<Vec<InboxEntry>> {
        let rows = Conversation::find()
            .filter(
                Condition::any()
                    .add(conversation::Column::Sender.eq(viewer))
                    .add(conversation::Column::Receiver.eq(viewer)),
            )
            .order_by_desc(conversation::Column::CreatedAt)
            .order_by_desc(conversation::Column::Id)
            .all(&self.db)
            .await?;

        Ok(fold_inbox(viewer, rows))
    }

    async fn append(
        &self,
        sender: &str,
        receiver: &str,
        body: &str,
    ) -> AppResult<ConversationModel> {
        let now = chrono::Utc::now().naive_utc();

        let row = conversation::ActiveModel {
            message: sea_orm::ActiveValue::Set(body.to_string()),
            sender: sea_orm::ActiveValue::Set(sender.to_string()),
            receiver: sea_orm::ActiveValue::Set(receiver.to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let row = row.insert(&self.db).await?;
        Ok(row)
    }
}

/// The fixed body of a claim-seeded message.
pub fn claim_message(item_id: i32) -> String {
    format!("Submitted claim request for item_id {}", item_id)
}

/// Group rows by "the other party" keeping the first row seen for each.
///
/// Expects `rows` in `(created_at, id)` descending order: the first row per
/// counterpart is then the pair's latest message, and first-sight order is
/// exactly descending by latest activity. When two rows share the maximum
/// timestamp the higher id wins — last write by insertion order.
fn fold_inbox(viewer: &str, rows: Vec<ConversationModel>) -> Vec<InboxEntry> {
    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    for row in rows {
        let counterpart = if row.sender == viewer {
            row.receiver
        } else {
            row.sender
        };
        if seen.insert(counterpart.clone()) {
            entries.push(InboxEntry {
                counterpart,
                last_message: row.message,
                last_activity: row.created_at,
            });
        }
    }

    entries
}
