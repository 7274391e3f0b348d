use std::time::Duration;

use keyhole_core::{LinkKey, NewLink, SecretKey, StorageError};
use keyhole_storage::MySqlRepository;
use keyhole_core::repository::{LinkRepository, ReadLinkRepository};
use keyhole_test_infra::mysql::{MySqlServer, MysqlConfig};
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        sqlx::query(include_str!("../ddl/mysql/links.sql"))
            .execute(&pool)
            .await
            .expect("create schema");

        Self {
            _mysql: mysql,
            repo: MySqlRepository::new(pool),
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
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

fn new_link(key: &str, secret: &str, url: &str) -> NewLink {
    NewLink {
        key: LinkKey::new(key),
        secret_key: SecretKey::new(secret),
        target_url: url.to_string(),
    }
}

#[tokio::test]
async fn insert_and_find_active_record() {
    let fixture = Fixture::start().await;

    let stored = fixture
        .repo
        .insert(new_link("ABCDE", "ABCDE_12345678", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(stored.clicks, 0);
    assert!(stored.is_active);

    let found = fixture
        .repo
        .find_by_key(&LinkKey::new("ABCDE"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.target_url, "https://example.com");
    assert_eq!(found.secret_key, SecretKey::new("ABCDE_12345678"));
    assert_eq!(found.created_at, stored.created_at);
}

#[tokio::test]
async fn insert_conflicts_when_key_already_exists() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_link("ABCDE", "ABCDE_11111111", "https://one.example"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(new_link("ABCDE", "ABCDE_22222222", "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::KeyConflict(_)));
}

#[tokio::test]
async fn find_by_secret_matches_only_active_records() {
    let fixture = Fixture::start().await;
    let secret = SecretKey::new("ABCDE_12345678");

    fixture
        .repo
        .insert(new_link("ABCDE", secret.as_str(), "https://example.com"))
        .await
        .unwrap();

    let found = fixture.repo.find_by_secret(&secret).await.unwrap().unwrap();
    assert_eq!(found.key, LinkKey::new("ABCDE"));

    fixture.repo.deactivate(&secret).await.unwrap().unwrap();

    assert!(fixture.repo.find_by_secret(&secret).await.unwrap().is_none());
}

#[tokio::test]
async fn increment_clicks_is_cumulative() {
    let fixture = Fixture::start().await;
    let key = LinkKey::new("ABCDE");

    fixture
        .repo
        .insert(new_link("ABCDE", "ABCDE_12345678", "https://example.com"))
        .await
        .unwrap();

    let first = fixture.repo.increment_clicks(&key).await.unwrap();
    assert_eq!(first.clicks, 1);

    let second = fixture.repo.increment_clicks(&key).await.unwrap();
    assert_eq!(second.clicks, 2);
}

#[tokio::test]
async fn deactivate_marks_record_inactive_exactly_once() {
    let fixture = Fixture::start().await;
    let secret = SecretKey::new("ABCDE_12345678");

    fixture
        .repo
        .insert(new_link("ABCDE", secret.as_str(), "https://example.com"))
        .await
        .unwrap();

    let deactivated = fixture.repo.deactivate(&secret).await.unwrap().unwrap();
    assert!(!deactivated.is_active);

    assert!(fixture
        .repo
        .find_by_key(&LinkKey::new("ABCDE"))
        .await
        .unwrap()
        .is_none());
    assert!(fixture.repo.deactivate(&secret).await.unwrap().is_none());
}

#[tokio::test]
async fn key_exists_tracks_historical_keys_for_no_reuse_policy() {
    let fixture = Fixture::start().await;
    let secret = SecretKey::new("HISTO_12345678");

    fixture
        .repo
        .insert(new_link("HISTO", secret.as_str(), "https://example.com"))
        .await
        .unwrap();
    fixture.repo.deactivate(&secret).await.unwrap();

    assert!(fixture
        .repo
        .key_exists(&LinkKey::new("HISTO"))
        .await
        .unwrap());
}
