use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub from_user_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub related_message_id: Option<Uuid>,
    pub related_connection_id: Option<Uuid>,
    pub is_read: bool,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(db: &DatabaseConnection, model: Model) -> Result<Model, DbErr> {
    let active = ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        kind: Set(model.kind),
        from_user_id: Set(model.from_user_id),
        title: Set(model.title),
        body: Set(model.body),
        related_message_id: Set(model.related_message_id),
        related_connection_id: Set(model.related_connection_id),
        is_read: Set(model.is_read),
        is_starred: Set(model.is_starred),
        created_at: Set(model.created_at),
        read_at: Set(model.read_at),
    };
    active.insert(db).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Newest first, descending `(created_at, id)`, capped at `limit`.
pub async fn list_for(
    db: &DatabaseConnection,
    user_id: Uuid,
    limit: u64,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(db)
        .await
}

pub async fn list_unread(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn list_starred(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsStarred.eq(true))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn unread_count(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .count(db)
        .await
}

pub async fn set_read(
    db: &DatabaseConnection,
    id: Uuid,
    read_at: Option<DateTime<Utc>>,
) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(read_at.is_some()))
        .col_expr(Column::ReadAt, Expr::value(read_at))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_starred(db: &DatabaseConnection, id: Uuid, starred: bool) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsStarred, Expr::value(starred))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Flag every unread notification of the user. Returns rows patched.
pub async fn mark_all_read(
    db: &DatabaseConnection,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .col_expr(Column::ReadAt, Expr::value(Some(now)))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_all_for(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
