
/// CRUD operations on the user table
pub mod crud_tests;

use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Connect and migrate, or `None` when no database is configured for tests.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || crate::db::DATABASE_URL.is_none() {
        eprintln!("skip: DATABASE_URL not set");
        return None;
    }
    let db = crate::db::connect().await.expect("connect db");
    migration::Migrator::up(&db, None).await.expect("migrate up");
    Some(db)
}
