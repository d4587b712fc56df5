use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(db: &DatabaseConnection, model: Model) -> Result<Model, DbErr> {
    let active = ActiveModel {
        id: Set(model.id),
        sender_id: Set(model.sender_id),
        receiver_id: Set(model.receiver_id),
        content: Set(model.content),
        sent_at: Set(model.sent_at),
        is_read: Set(model.is_read),
    };
    active.insert(db).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn mark_read(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Flip the read flag on everything `receiver_id` still has unread from
/// `sender_id`. Returns rows patched, zero when nothing was unread.
pub async fn mark_conversation_read(
    db: &DatabaseConnection,
    receiver_id: Uuid,
    sender_id: Uuid,
) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::ReceiverId.eq(receiver_id))
        .filter(Column::SenderId.eq(sender_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Both directions between two users, ascending `(sent_at, id)`.
pub async fn conversation(
    db: &DatabaseConnection,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(user_a))
                        .add(Column::ReceiverId.eq(user_b)),
                )
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(user_b))
                        .add(Column::ReceiverId.eq(user_a)),
                ),
        )
        .order_by_asc(Column::SentAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

/// Every message the user sent or received, descending `(sent_at, id)`.
pub async fn all_touching(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::SenderId.eq(user_id))
                .add(Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(Column::SentAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

pub async fn unread_count(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::ReceiverId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .count(db)
        .await
}
