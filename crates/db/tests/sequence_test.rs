//! Integration tests for gap-free document numbering.

#![allow(clippy::unwrap_used)]

mod common;

use common::{setup_db, setup_postgres};
use futures::future::join_all;
use paybook_db::SequenceRepository;
use sea_orm::DatabaseConnection;

#[tokio::test]
async fn test_first_number_creates_sequence() {
    let db = setup_db().await;
    let sequences = SequenceRepository::new(db);

    assert_eq!(sequences.peek("VOU").await.unwrap(), 0);
    assert_eq!(sequences.next_number("VOU").await.unwrap(), "VOU-000001");
    assert_eq!(sequences.next_number("VOU").await.unwrap(), "VOU-000002");
    assert_eq!(sequences.peek("VOU").await.unwrap(), 2);
}

#[tokio::test]
async fn test_ensure_is_idempotent_and_allocates_nothing() {
    let db = setup_db().await;
    let sequences = SequenceRepository::new(db);

    sequences.ensure("VOU").await.unwrap();
    sequences.ensure("VOU").await.unwrap();
    assert_eq!(sequences.peek("VOU").await.unwrap(), 0);

    assert_eq!(sequences.next_number("VOU").await.unwrap(), "VOU-000001");
    sequences.ensure("VOU").await.unwrap();
    assert_eq!(sequences.peek("VOU").await.unwrap(), 1);
}

#[tokio::test]
async fn test_document_types_are_independent() {
    let db = setup_db().await;
    let sequences = SequenceRepository::new(db);

    sequences.next_number("VOU").await.unwrap();
    sequences.next_number("VOU").await.unwrap();

    assert_eq!(sequences.next_number("PAY").await.unwrap(), "PAY-000001");
    assert_eq!(sequences.peek("VOU").await.unwrap(), 2);
    assert_eq!(sequences.peek("PAY").await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_numbers_are_distinct_and_contiguous() {
    // Interleaved calls on the single SQLite connection.
    assert_concurrent_numbers_contiguous(setup_db().await).await;
}

#[tokio::test]
async fn test_concurrent_numbers_on_postgres() {
    let Some(db) = setup_postgres().await else {
        return;
    };
    assert_concurrent_numbers_contiguous(db).await;
}

async fn assert_concurrent_numbers_contiguous(db: DatabaseConnection) {
    let sequences = SequenceRepository::new(db);

    let calls = (0..20).map(|_| {
        let sequences = sequences.clone();
        async move { sequences.next_number("VOU").await }
    });
    let results = join_all(calls).await;

    let mut numbers: Vec<i64> = results
        .into_iter()
        .map(|r| r.unwrap())
        .map(|number| number.trim_start_matches("VOU-").parse().unwrap())
        .collect();
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=20).collect::<Vec<i64>>());
    assert_eq!(sequences.peek("VOU").await.unwrap(), 20);
}
