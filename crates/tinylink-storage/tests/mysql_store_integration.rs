//! Requires a running docker daemon: `cargo test -- --ignored`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use tinylink_core::{CreateOutcome, LinkStore, Token};
use tinylink_storage::MySqlLinkStore;
use tinylink_test_infra::mysql::{MySqlServer, MysqlConfig};

struct Fixture {
    _mysql: MySqlServer,
    store: MySqlLinkStore,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let store = MySqlLinkStore::new(pool);
        store.migrate().await.expect("create schema");

        Self {
            _mysql: mysql,
            store,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(8)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn token(value: &str) -> Token {
    Token::new_unchecked(value)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn create_and_find() {
    let fixture = Fixture::start().await;
    let t = token("sDikWv9ct8cM");

    let outcome = fixture
        .store
        .create_if_absent(&t, "https://example.com/a")
        .await
        .unwrap();
    assert!(outcome.created);

    let got = fixture.store.find_by_token(&t).await.unwrap();
    assert_eq!(got.as_deref(), Some("https://example.com/a"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn create_returns_existing_row_on_conflict() {
    let fixture = Fixture::start().await;
    let t = token("sDikWv9ct8cM");

    fixture
        .store
        .create_if_absent(&t, "https://one.example")
        .await
        .unwrap();
    let outcome = fixture
        .store
        .create_if_absent(&t, "https://two.example")
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::existing("https://one.example"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn token_comparison_is_case_sensitive() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create_if_absent(&token("abcdefghijkm"), "https://lower.example")
        .await
        .unwrap();
    let upper = fixture
        .store
        .create_if_absent(&token("ABCDEFGHJKLM"), "https://upper.example")
        .await
        .unwrap();

    assert!(upper.created);
    assert!(fixture
        .store
        .find_by_token(&token("ABCDEFGHJKLm"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_target_rewrites_existing_row() {
    let fixture = Fixture::start().await;
    let t = token("sDikWv9ct8cM");

    fixture
        .store
        .create_if_absent(&t, "aHR0cHM6Ly9leGFtcGxlLmNvbS9h")
        .await
        .unwrap();
    assert!(fixture
        .store
        .update_target(&t, "https://example.com/a")
        .await
        .unwrap());

    let got = fixture.store.find_by_token(&t).await.unwrap();
    assert_eq!(got.as_deref(), Some("https://example.com/a"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_creates_store_a_single_row() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());
    let t = token("sDikWv9ct8cM");
    let mut handles = vec![];

    for _ in 0..16 {
        let store = Arc::clone(&store);
        let t = t.clone();
        handles.push(tokio::spawn(async move {
            store
                .create_if_absent(&t, "https://example.com/a")
                .await
                .unwrap()
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().created {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_link_map")
        .fetch_one(fixture.store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
