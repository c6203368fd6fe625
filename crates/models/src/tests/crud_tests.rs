use crate::errors::ModelError;
use crate::user;
use super::setup_test_db;
use sea_orm::EntityTrait;
use anyhow::Result;
use uuid::Uuid;

fn unique_email() -> String {
    format!("user_{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn test_user_create_and_find() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let created = user::create(&db, "Bunny", &email, "$argon2id$fake").await?;
    assert_eq!(created.email, email);

    let found = user::find_by_email(&db, &email).await?.expect("user present");
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "Bunny");

    // lookups are case-sensitive
    assert!(user::find_by_email(&db, &email.to_uppercase()).await?.is_none());

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_rejected_by_index() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let first = user::create(&db, "A", &email, "$argon2id$one").await?;
    let second = user::create(&db, "B", &email, "$argon2id$two").await;
    assert!(matches!(second, Err(ModelError::Duplicate(_))), "got {:?}", second);
    assert_eq!(user::count_by_email(&db, &email).await?, 1);

    user::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_concurrent_duplicate_inserts() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let (a, b) = tokio::join!(
        user::create(&db, "A", &email, "$argon2id$one"),
        user::create(&db, "B", &email, "$argon2id$two"),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(user::count_by_email(&db, &email).await?, 1);

    let winner = a.or(b)?;
    user::Entity::delete_by_id(winner.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_list_preserves_insertion_order() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let e1 = unique_email();
    let e2 = unique_email();
    let u1 = user::create(&db, "First", &e1, "$argon2id$one").await?;
    let u2 = user::create(&db, "Second", &e2, "$argon2id$two").await?;

    let listed = user::list(&db).await?;
    let p1 = listed.iter().position(|l| l.id == u1.id).expect("first listed");
    let p2 = listed.iter().position(|l| l.id == u2.id).expect("second listed");
    assert!(p1 < p2);
    assert_eq!(listed[p1].name, "First");

    user::Entity::delete_by_id(u1.id).exec(&db).await?;
    user::Entity::delete_by_id(u2.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_create_validates_fields() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let res = user::create(&db, "", &unique_email(), "$argon2id$x").await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    let res = user::create(&db, "N", "no-at-sign", "$argon2id$x").await;
    assert!(matches!(res, Err(ModelError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn test_over_long_fields_are_validation_errors() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let res = user::create(&db, &"N".repeat(200), &email, "$argon2id$x").await;
    assert!(matches!(res, Err(ModelError::Validation(_))), "got {:?}", res);

    let long_email = format!("{}@example.com", "b".repeat(260));
    let res = user::create(&db, "N", &long_email, "$argon2id$x").await;
    assert!(matches!(res, Err(ModelError::Validation(_))), "got {:?}", res);

    // the column limit itself is accepted
    let at_limit = user::create(&db, &"N".repeat(user::NAME_MAX_CHARS), &email, "$argon2id$x").await?;
    assert_eq!(at_limit.name.chars().count(), user::NAME_MAX_CHARS);
    user::Entity::delete_by_id(at_limit.id).exec(&db).await?;
    Ok(())
}
