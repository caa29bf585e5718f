//! Social graph and feed integration tests.
//!
//! These run against a live PostgreSQL instance:
//!
//!   DATABASE_URL=postgres://localhost/microblog_test cargo test -- --ignored
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use microblog_service::db::{follows, users};
use microblog_service::error::AppError;
use microblog_service::models::User;
use microblog_service::services::{FeedService, FollowService, PostService};

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
async fn test_follow_then_unfollow_roundtrip() {
    let pool = setup().await;
    let service = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;

    assert!(!service.is_following(a.id, b.id).await.unwrap());

    service.follow(a.id, b.id).await.unwrap();
    assert!(service.is_following(a.id, b.id).await.unwrap());

    service.unfollow(a.id, b.id).await.unwrap();
    assert!(!service.is_following(a.id, b.id).await.unwrap());
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_double_follow_leaves_one_edge() {
    let pool = setup().await;
    let service = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;

    assert!(service.follow(a.id, b.id).await.unwrap());
    // Second follow succeeds silently without duplicating the edge
    assert!(!service.follow(a.id, b.id).await.unwrap());

    assert_eq!(service.follower_count(b.id).await.unwrap(), 1);
    assert_eq!(service.following_count(a.id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_unfollow_missing_edge_is_silent_noop() {
    let pool = setup().await;
    let service = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;

    let removed = service.unfollow(a.id, b.id).await.unwrap();
    assert!(!removed);
    assert_eq!(service.follower_count(b.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_self_follow_rejected() {
    let pool = setup().await;
    let service = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;

    assert!(matches!(
        service.follow(a.id, a.id).await,
        Err(AppError::SelfFollow)
    ));
    assert!(matches!(
        service.unfollow(a.id, a.id).await,
        Err(AppError::SelfFollow)
    ));
    assert_eq!(service.follower_count(a.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_feed_always_includes_own_posts() {
    let pool = setup().await;
    let posts = PostService::new(pool.clone(), None);
    let feed = FeedService::new(pool.clone());
    let a = create_user(&pool, "alice").await;

    let own = posts.create_post(a.id, "my first post").await.unwrap();

    let page = feed.feed(a.id, 1, 20).await.unwrap();
    assert!(page.items.iter().any(|p| p.id == own.id));
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_feed_tracks_follow_state_as_live_view() {
    let pool = setup().await;
    let posts = PostService::new(pool.clone(), None);
    let feed = FeedService::new(pool.clone());
    let follow = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;

    follow.follow(a.id, b.id).await.unwrap();
    let followed_post = posts.create_post(b.id, "hello from bob").await.unwrap();

    let page = feed.feed(a.id, 1, 20).await.unwrap();
    assert!(page.items.iter().any(|p| p.id == followed_post.id));

    follow.unfollow(a.id, b.id).await.unwrap();
    let later_post = posts.create_post(b.id, "bob again").await.unwrap();

    let page = feed.feed(a.id, 1, 20).await.unwrap();
    assert!(!page.items.iter().any(|p| p.id == later_post.id));
    assert!(!page.items.iter().any(|p| p.id == followed_post.id));
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_feed_ordering_timestamp_then_id_descending() {
    let pool = setup().await;
    let feed = FeedService::new(pool.clone());
    let a = create_user(&pool, "alice").await;

    // P1 at t=1; P2 and P3 share t=2 with P3's id greater than P2's.
    let p1 = Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap();
    let p2 = Uuid::parse_str("00000000-0000-4000-8000-000000000002").unwrap();
    let p3 = Uuid::parse_str("00000000-0000-4000-8000-000000000003").unwrap();

    for (id, body, ts) in [
        (p1, "first", "2024-01-01T00:00:01Z"),
        (p2, "second", "2024-01-01T00:00:02Z"),
        (p3, "third", "2024-01-01T00:00:02Z"),
    ] {
        sqlx::query(
            "INSERT INTO posts (id, user_id, body, created_at) VALUES ($1, $2, $3, $4::timestamptz)",
        )
        .bind(id)
        .bind(a.id)
        .bind(body)
        .bind(ts)
        .execute(&pool)
        .await
        .unwrap();
    }

    let page = feed.feed(a.id, 1, 20).await.unwrap();
    let ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![p3, p2, p1]);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_feed_page_contains_no_duplicates() {
    let pool = setup().await;
    let posts = PostService::new(pool.clone(), None);
    let feed = FeedService::new(pool.clone());
    let follow = FollowService::new(pool.clone());
    let a = create_user(&pool, "alice").await;
    let b = create_user(&pool, "bob").await;

    // Mutual follow plus self-authored posts: the historical worst case
    // for join-based feed composition.
    follow.follow(a.id, b.id).await.unwrap();
    follow.follow(b.id, a.id).await.unwrap();
    posts.create_post(a.id, "alice post").await.unwrap();
    posts.create_post(b.id, "bob post").await.unwrap();

    let page = feed.feed(a.id, 1, 20).await.unwrap();
    let mut ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(before, ids.len());
    assert_eq!(before, 2);
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_counts_match_edge_set_after_interleaving() {
    let pool = setup().await;
    let service = FollowService::new(pool.clone());
    let hub = create_user(&pool, "hub").await;
    let mut spokes = Vec::new();
    for i in 0..5 {
        spokes.push(create_user(&pool, &format!("spoke{i}")).await);
    }

    for spoke in &spokes {
        service.follow(spoke.id, hub.id).await.unwrap();
    }
    service.unfollow(spokes[0].id, hub.id).await.unwrap();
    service.unfollow(spokes[1].id, hub.id).await.unwrap();
    // Re-follow one of the removed edges
    service.follow(spokes[0].id, hub.id).await.unwrap();

    assert_eq!(service.follower_count(hub.id).await.unwrap(), 4);
    assert!(follows::exists(&pool, spokes[0].id, hub.id).await.unwrap());
    assert!(!follows::exists(&pool, spokes[1].id, hub.id).await.unwrap());
}

#[tokio::test]
#[ignore] // Only run with `--ignored` flag against a live database
async fn test_user_timeline_pagination_flags() {
    let pool = setup().await;
    let posts = PostService::new(pool.clone(), None);
    let feed = FeedService::new(pool.clone());
    let a = create_user(&pool, "alice").await;

    for i in 0..3 {
        posts.create_post(a.id, &format!("post {i}")).await.unwrap();
    }

    let first = feed.user_posts(a.id, 1, 2).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 3);
    assert!(first.has_next);
    assert!(!first.has_prev);

    let second = feed.user_posts(a.id, 2, 2).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(!second.has_next);
    assert!(second.has_prev);

    // No post appears on both pages
    assert!(first
        .items
        .iter()
        .all(|p| second.items.iter().all(|q| q.id != p.id)));
}
