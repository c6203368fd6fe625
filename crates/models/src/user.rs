use sea_orm::{entity::prelude::*, Set, DatabaseConnection, FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect};
use uuid::Uuid;
use chrono::Utc;
use serde::Serialize;

use crate::errors::ModelError;

/// Stored account row. Deliberately not `Serialize`: it carries the hash.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Public projection of a user; the hash column is never selected.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Width of the `name` column, in characters.
pub const NAME_MAX_CHARS: usize = 128;
/// Width of the `email` column, in characters.
pub const EMAIL_MAX_CHARS: usize = 255;

/// Insert a user. A taken email surfaces as [`ModelError::Duplicate`] from the
/// unique index, so concurrent inserts of one email cannot both succeed.
pub async fn create(db: &DatabaseConnection, name: &str, email: &str, password_hash: &str) -> Result<Model, ModelError> {
    if !email.contains('@') { return Err(ModelError::Validation("invalid email".into())); }
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if password_hash.trim().is_empty() { return Err(ModelError::Validation("password hash required".into())); }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ModelError::Validation(format!("name must be at most {NAME_MAX_CHARS} characters")));
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(ModelError::Validation(format!("email must be at most {EMAIL_MAX_CHARS} characters")));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Exact, case-sensitive match on email.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// All users in insertion order, without the hash column.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Listing>, ModelError> {
    let rows = Entity::find()
        .select_only()
        .columns([Column::Id, Column::Name, Column::Email])
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .into_model::<Listing>()
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn count_by_email(db: &DatabaseConnection, email: &str) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).count(db).await?)
}
