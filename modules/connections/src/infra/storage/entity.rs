use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "connections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Edge lookup for an ordered pair; covered by the unique index.
pub async fn find_edge(
    db: &DatabaseConnection,
    requester_id: Uuid,
    receiver_id: Uuid,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::RequesterId.eq(requester_id))
        .filter(Column::ReceiverId.eq(receiver_id))
        .one(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, model: Model) -> Result<Model, DbErr> {
    let active = ActiveModel {
        id: Set(model.id),
        requester_id: Set(model.requester_id),
        receiver_id: Set(model.receiver_id),
        status: Set(model.status),
        message: Set(model.message),
        created_at: Set(model.created_at),
        responded_at: Set(model.responded_at),
    };
    active.insert(db).await
}

/// Conditional status transition: applies only while the row still holds
/// `expected`. The caller reads `rows_affected` to learn whether it won.
pub async fn set_status_if(
    db: &DatabaseConnection,
    id: Uuid,
    expected: &str,
    next: &str,
    responded_at: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(next))
        .col_expr(Column::RespondedAt, Expr::value(responded_at))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(expected))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Conditional hard delete, same contract as [`set_status_if`].
pub async fn delete_if(db: &DatabaseConnection, id: Uuid, expected: &str) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(expected))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Edges touching the user in either direction with the given status,
/// newest first.
pub async fn list_for_user_with_status(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: &str,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::Status.eq(status))
        .filter(
            Condition::any()
                .add(Column::RequesterId.eq(user_id))
                .add(Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn list_pending_to(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::ReceiverId.eq(user_id))
        .filter(Column::Status.eq("pending"))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn list_pending_from(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::RequesterId.eq(user_id))
        .filter(Column::Status.eq("pending"))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn count_pending_to(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::ReceiverId.eq(user_id))
        .filter(Column::Status.eq("pending"))
        .count(db)
        .await
}
