use super::*;

/// Tests writing a name for a resource with no entry.
///
/// Expected: Ok with one entry holding the name
#[tokio::test]
async fn inserts_new_entry() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PendingRenameRepository::new(db);
    repo.set("1001", "Alpha", Utc::now()).await?;

    let stored = repo.get("1001").await?.expect("target should exist");
    assert_eq!(stored.name, "Alpha");

    Ok(())
}

/// Tests that a second write overwrites the first.
///
/// Verifies last-write-wins: only one row per resource and it holds the
/// most recent name.
///
/// Expected: Ok with a single entry holding the newest name
#[tokio::test]
async fn overwrites_previous_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PendingRenameRepository::new(db);
    repo.set("1001", "Alpha", Utc::now()).await?;
    repo.set("1001", "Beta", Utc::now()).await?;
    repo.set("1001", "Gamma", Utc::now()).await?;

    let stored = repo.get("1001").await?.expect("target should exist");
    assert_eq!(stored.name, "Gamma");

    let count = entity::prelude::PendingRename::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that writes for different resources do not interfere.
///
/// Expected: Ok with one entry per resource
#[tokio::test]
async fn keeps_resources_independent() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::PendingRename)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PendingRenameRepository::new(db);
    repo.set("1001", "Alpha", Utc::now()).await?;
    repo.set("2002", "Beta", Utc::now()).await?;

    assert_eq!(repo.get("1001").await?.unwrap().name, "Alpha");
    assert_eq!(repo.get("2002").await?.unwrap().name, "Beta");

    Ok(())
}
