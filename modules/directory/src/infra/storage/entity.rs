use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub subject: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    /// JSON-encoded array of skill strings.
    pub skills: String,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Lookup by the identity provider's subject. The column carries a unique
/// index, so this never scans.
pub async fn find_by_subject(db: &DatabaseConnection, subject: &str) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::Subject.eq(subject))
        .one(db)
        .await
}

pub async fn find_many(db: &DatabaseConnection, ids: &[Uuid]) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, model: Model) -> Result<Model, DbErr> {
    let active = ActiveModel {
        id: Set(model.id),
        subject: Set(model.subject),
        name: Set(model.name),
        email: Set(model.email),
        role: Set(model.role),
        bio: Set(model.bio),
        skills: Set(model.skills),
        location: Set(model.location),
        avatar_url: Set(model.avatar_url),
        created_at: Set(model.created_at),
    };
    active.insert(db).await
}

/// Refresh the identity-provider-owned fields of an existing row.
pub async fn update_sync_fields(
    db: &DatabaseConnection,
    id: Uuid,
    name: String,
    email: String,
    avatar_url: Option<String>,
) -> Result<Model, DbErr> {
    let mut active = ActiveModel {
        id: Set(id),
        name: Set(name),
        email: Set(email),
        ..Default::default()
    };
    // An absent avatar in the sync payload leaves the stored one alone.
    if let Some(url) = avatar_url {
        active.avatar_url = Set(Some(url));
    }
    active.update(db).await
}

/// Persist the full profile of an existing row.
pub async fn update_profile(db: &DatabaseConnection, model: Model) -> Result<Model, DbErr> {
    let active = ActiveModel {
        id: Set(model.id),
        subject: Set(model.subject),
        name: Set(model.name),
        email: Set(model.email),
        role: Set(model.role),
        bio: Set(model.bio),
        skills: Set(model.skills),
        location: Set(model.location),
        avatar_url: Set(model.avatar_url),
        created_at: Set(model.created_at),
    };
    active.update(db).await
}

pub async fn delete_by_subject(db: &DatabaseConnection, subject: &str) -> Result<bool, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::Subject.eq(subject))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Role filter plus case-insensitive substring match on name/email.
pub async fn search(
    db: &DatabaseConnection,
    role: Option<&str>,
    query: Option<&str>,
) -> Result<Vec<Model>, DbErr> {
    let mut select = Entity::find().order_by_asc(Column::Name);
    if let Some(role) = role {
        select = select.filter(Column::Role.eq(role));
    }
    if let Some(q) = query {
        let pattern = format!("%{}%", q.to_lowercase());
        select = select.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(Column::Email))).like(pattern)),
        );
    }
    select.all(db).await
}
