use super::*;

/// Tests that the entry is removed when it still holds the applied name.
///
/// Expected: Ok(true) and the entry is gone
#[tokio::test]
async fn deletes_when_name_matches() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_pending_rename(db, "1001", "Alpha").await?;

    let repo = PendingRenameRepository::new(db);

    assert!(repo.delete_if_name("1001", "Alpha").await?);
    assert!(repo.get("1001").await?.is_none());

    Ok(())
}

/// Tests that a newer name written after the read survives.
///
/// Expected: Ok(false) and the newer name is still stored
#[tokio::test]
async fn keeps_newer_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_pending_rename(db, "1001", "Beta").await?;

    let repo = PendingRenameRepository::new(db);

    assert!(!repo.delete_if_name("1001", "Alpha").await?);
    assert_eq!(repo.get("1001").await?.unwrap().name, "Beta");

    Ok(())
}
