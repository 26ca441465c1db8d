use super::*;

/// Tests deleting an existing entry.
///
/// Expected: Ok(true) and the entry is gone
#[tokio::test]
async fn deletes_existing_entry() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_pending_rename(db, "1001", "Alpha").await?;
    factory::create_pending_rename(db, "2002", "Beta").await?;

    let repo = PendingRenameRepository::new(db);

    assert!(repo.delete("1001").await?);
    assert!(repo.get("1001").await?.is_none());
    assert!(repo.get("2002").await?.is_some());

    Ok(())
}

/// Tests deleting a resource with nothing pending.
///
/// Expected: Ok(false)
#[tokio::test]
async fn reports_missing_entry() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PendingRenameRepository::new(db);

    assert!(!repo.delete("1001").await?);

    Ok(())
}
