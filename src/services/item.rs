use crate::{
    error::{AppError, AppResult},
    models::{item, item_location, Item, ItemLocation, ItemLocationModel, ItemModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

/// Fields of a new item report, minus the locations that ride alongside.
pub struct NewItem {
    pub description: String,
    pub category: String,
    pub report_type: String,
    pub place_of_responsibility: String,
    pub username: String,
    pub image: Option<String>,
}

pub struct ItemService {
    db: DatabaseConnection,
}

impl ItemService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create one item and one location row per supplied string, all in a
    /// single transaction. A failure on any location insert rolls the item
    /// back too; the store never holds a half-written report.
    pub async fn create(
        &self,
        report: NewItem,
        locations: Vec<String>,
    ) -> AppResult<(ItemModel, Vec<ItemLocationModel>)> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let new_item = item::ActiveModel {
            description: sea_orm::ActiveValue::Set(report.description),
            category: sea_orm::ActiveValue::Set(report.category),
            report_type: sea_orm::ActiveValue::Set(report.report_type),
            place_of_responsibility: sea_orm::ActiveValue::Set(report.place_of_responsibility),
            username: sea_orm::ActiveValue::Set(report.username),
            image: sea_orm::ActiveValue::Set(report.image),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let item = new_item.insert(&txn).await?;

        let mut created = Vec::with_capacity(locations.len());
        for location in locations {
            let row = item_location::ActiveModel {
                item_id: sea_orm::ActiveValue::Set(item.id),
                location: sea_orm::ActiveValue::Set(location),
                ..Default::default()
            };
            created.push(row.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok((item, created))
    }

    /// Paginated listing, newest report first.
    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<ItemModel>, u64)> {
        let paginator = Item::find()
            .order_by_desc(item::Column::CreatedAt)
            .order_by_desc(item::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: i32) -> AppResult<ItemModel> {
        Item::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn locations_of(&self, item_id: i32) -> AppResult<Vec<ItemLocationModel>> {
        let locations = ItemLocation::find()
            .filter(item_location::Column::ItemId.eq(item_id))
            .order_by_asc(item_location::Column::Id)
            .all(&self.db)
            .await?;
        Ok(locations)
    }

    /// Items routed to a place of responsibility — the admin claims view.
    pub async fn list_by_responsibility(&self, place: &str) -> AppResult<Vec<ItemModel>> {
        let items = Item::find()
            .filter(item::Column::PlaceOfResponsibility.eq(place))
            .order_by_desc(item::Column::CreatedAt)
            .order_by_desc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }
}
