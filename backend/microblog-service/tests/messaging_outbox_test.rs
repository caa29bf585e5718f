//! Private-message and search-outbox integration tests.
//!
//! These run against a live PostgreSQL instance:
//!
//!   DATABASE_URL=postgres://localhost/microblog_test cargo test -- --ignored
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use microblog_service::db::{messages, users};
use microblog_service::models::User;
use microblog_service::search::outbox;
use microblog_service::services::PostService;

async fn setup() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

async fn create_user(pool: &PgPool, prefix: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("{prefix}_{}", &suffix[..12]);
    let email = format!("{username}@example.com");
    users::create_user(pool, &username, &email, "x").await.expect("create user")
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_unread_count_follows_read_marker() {
    let pool = setup().await;
    let sender = create_user(&pool, "sender").await;
    let recipient = create_user(&pool, "recipient").await;

    messages::insert_message(&pool, sender.id, recipient.id, "hi").await.unwrap();
    messages::insert_message(&pool, sender.id, recipient.id, "hello again").await.unwrap();

    // Never opened the inbox: everything is unread
    let unread = messages::unread_count(&pool, recipient.id, None).await.unwrap();
    assert_eq!(unread, 2);

    users::mark_messages_read(&pool, recipient.id, Utc::now()).await.unwrap();
    let recipient = users::find_by_id(&pool, recipient.id).await.unwrap().unwrap();
    let unread = messages::unread_count(&pool, recipient.id, recipient.last_message_read_time)
        .await
        .unwrap();
    assert_eq!(unread, 0);

    messages::insert_message(&pool, sender.id, recipient.id, "one more").await.unwrap();
    let unread = messages::unread_count(&pool, recipient.id, recipient.last_message_read_time)
        .await
        .unwrap();
    assert_eq!(unread, 1);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_received_messages_newest_first() {
    let pool = setup().await;
    let sender = create_user(&pool, "sender").await;
    let recipient = create_user(&pool, "recipient").await;

    let first = messages::insert_message(&pool, sender.id, recipient.id, "first").await.unwrap();
    let second = messages::insert_message(&pool, sender.id, recipient.id, "second").await.unwrap();

    let listing = messages::received_page(&pool, recipient.id, 20, 0).await.unwrap();

    // Newest first: the second message precedes the first
    let idx_first = listing.iter().position(|m| m.id == first.id).unwrap();
    let idx_second = listing.iter().position(|m| m.id == second.id).unwrap();
    assert!(idx_second < idx_first);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_post_creation_enqueues_outbox_entry_transactionally() {
    let pool = setup().await;
    let author = create_user(&pool, "author").await;
    let index = format!("posts_test_{}", Uuid::new_v4().simple());

    let service = PostService::new(pool.clone(), Some(index.clone()));
    let post = service.create_post(author.id, "searchable body").await.unwrap();

    let entries = outbox::poll_unprocessed(&pool, 100, 5).await.unwrap();
    let entry = entries
        .iter()
        .find(|e| e.document_id == post.id)
        .expect("outbox entry written with the post");

    assert_eq!(entry.op, outbox::OP_INDEX);
    assert_eq!(entry.index_name, index);
    assert_eq!(
        entry.payload.as_ref().and_then(|p| p["body"].as_str()),
        Some("searchable body")
    );
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_outbox_retry_accounting() {
    let pool = setup().await;
    let author = create_user(&pool, "author").await;
    let index = format!("posts_test_{}", Uuid::new_v4().simple());

    let service = PostService::new(pool.clone(), Some(index.clone()));
    let post = service.create_post(author.id, "retry me").await.unwrap();

    let entry_id = outbox::poll_unprocessed(&pool, 100, 5)
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.document_id == post.id)
        .unwrap()
        .id;

    // Exhaust the retry budget
    for _ in 0..3 {
        outbox::mark_failed(&pool, entry_id, "index unreachable").await.unwrap();
    }

    let still_eligible = outbox::poll_unprocessed(&pool, 100, 5).await.unwrap();
    assert!(still_eligible.iter().any(|e| e.id == entry_id));

    let exhausted = outbox::poll_unprocessed(&pool, 100, 3).await.unwrap();
    assert!(!exhausted.iter().any(|e| e.id == entry_id));
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_delete_ops_enqueue_without_payload() {
    let pool = setup().await;
    let index = format!("posts_test_{}", Uuid::new_v4().simple());
    let document_id = Uuid::new_v4();

    let mut tx = pool.begin().await.unwrap();
    outbox::enqueue_delete(&mut tx, &index, document_id).await.unwrap();
    tx.commit().await.unwrap();

    let entry = outbox::poll_unprocessed(&pool, 100, 5)
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.document_id == document_id)
        .expect("delete entry enqueued");

    assert_eq!(entry.op, outbox::OP_DELETE);
    assert!(entry.payload.is_none());

    outbox::mark_processed(&pool, entry.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_processed_entries_leave_the_queue() {
    let pool = setup().await;
    let author = create_user(&pool, "author").await;
    let index = format!("posts_test_{}", Uuid::new_v4().simple());

    let service = PostService::new(pool.clone(), Some(index.clone()));
    let post = service.create_post(author.id, "process me").await.unwrap();

    let entry_id = outbox::poll_unprocessed(&pool, 100, 5)
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.document_id == post.id)
        .unwrap()
        .id;

    outbox::mark_processed(&pool, entry_id).await.unwrap();

    let remaining = outbox::poll_unprocessed(&pool, 100, 5).await.unwrap();
    assert!(!remaining.iter().any(|e| e.id == entry_id));
}
