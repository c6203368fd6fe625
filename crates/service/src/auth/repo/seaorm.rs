use sea_orm::DatabaseConnection;

use models::errors::ModelError;
use models::user;

use crate::auth::domain::{NewUser, UserRecord, UserSummary};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_record(u: user::Model) -> UserRecord {
    UserRecord { id: u.id, name: u.name, email: u.email, password_hash: u.password_hash }
}

fn map_model_err(e: ModelError) -> AuthError {
    match e {
        ModelError::Duplicate(_) => AuthError::DuplicateEmail,
        ModelError::Validation(msg) => AuthError::Validation(msg),
        ModelError::Db(msg) => AuthError::Internal(msg),
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let res = user::find_by_email(&self.db, email).await.map_err(map_model_err)?;
        Ok(res.map(to_record))
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, AuthError> {
        let created = user::create(&self.db, &new_user.name, &new_user.email, &new_user.password_hash)
            .await
            .map_err(map_model_err)?;
        Ok(to_record(created))
    }

    async fn find_all(&self) -> Result<Vec<UserSummary>, AuthError> {
        let rows = user::list(&self.db).await.map_err(map_model_err)?;
        Ok(rows.into_iter().map(|l| UserSummary { id: l.id, name: l.name, email: l.email }).collect())
    }
}
