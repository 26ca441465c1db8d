use super::*;

/// Tests reading a stored pending name.
///
/// Expected: Ok(Some) with the stored name
#[tokio::test]
async fn returns_stored_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_pending_rename(db, "1001", "Alpha").await?;

    let repo = PendingRenameRepository::new(db);
    let target = repo.get("1001").await?;

    let target = target.expect("target should exist");
    assert_eq!(target.resource_id, "1001");
    assert_eq!(target.name, "Alpha");

    Ok(())
}

/// Tests reading a resource that has nothing pending.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_when_absent() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_pending_rename(db, "1001", "Alpha").await?;

    let repo = PendingRenameRepository::new(db);

    assert!(repo.get("2002").await?.is_none());

    Ok(())
}
