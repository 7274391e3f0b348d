use async_trait::async_trait;
use jiff::Timestamp;
use keyhole_core::error::{Result, StorageError};
use keyhole_core::repository::{LinkRepository, ReadLinkRepository};
use keyhole_core::{Link, LinkKey, NewLink, SecretKey};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the repository contract.
///
/// Soft delete is implemented with the `is_active` flag. Reads only return
/// active records; `key_exists` checks every row, active or not, so a key
/// is never handed out twice with a single-row-per-key model. Key
/// uniqueness is backed by a unique index rather than the caller's
/// pre-check, and violations surface as [`StorageError::KeyConflict`].
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Fetches a row by public key regardless of activity state. Used for
    /// write-then-read-back after inserts and click increments.
    async fn fetch_any_by_key(&self, key: &LinkKey) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT link_key, secret_key, target_url, is_active, clicks, created_at
            FROM links
            WHERE link_key = ?
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| link_from_row(&row)).transpose()
    }
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn link_from_row(row: &MySqlRow) -> Result<Link> {
    let key: String = row.try_get("link_key").map_err(map_sqlx_error)?;
    let secret_key: String = row.try_get("secret_key").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let is_active: bool = row.try_get("is_active").map_err(map_sqlx_error)?;
    let clicks: u64 = row.try_get("clicks").map_err(map_sqlx_error)?;
    let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(Link {
        key: LinkKey::new(key),
        secret_key: SecretKey::new(secret_key),
        target_url,
        is_active,
        clicks,
        created_at: parse_created_at(created_at_raw)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadLinkRepository for MySqlRepository {
    async fn find_by_key(&self, key: &LinkKey) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT link_key, secret_key, target_url, is_active, clicks, created_at
            FROM links
            WHERE link_key = ?
              AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| link_from_row(&row)).transpose()
    }

    async fn find_by_secret(&self, secret: &SecretKey) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT link_key, secret_key, target_url, is_active, clicks, created_at
            FROM links
            WHERE secret_key = ?
              AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(secret.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| link_from_row(&row)).transpose()
    }

    async fn key_exists(&self, key: &LinkKey) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM links
            WHERE link_key = ?
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl LinkRepository for MySqlRepository {
    async fn insert(&self, link: NewLink) -> Result<Link> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (link_key, secret_key, target_url, is_active, clicks, created_at)
            VALUES (?, ?, ?, TRUE, 0, ?)
            "#,
        )
        .bind(link.key.as_str())
        .bind(link.secret_key.as_str())
        .bind(&link.target_url)
        .bind(now_unix_seconds())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::KeyConflict(link.key.to_string()))
            }
            Err(err) => return Err(map_sqlx_error(err)),
        }

        self.fetch_any_by_key(&link.key).await?.ok_or_else(|| {
            StorageError::Operation(format!("inserted record not found: {}", link.key))
        })
    }

    async fn increment_clicks(&self, key: &LinkKey) -> Result<Link> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE link_key = ?
            "#,
        )
        .bind(key.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Operation(format!("no record for key: {key}")));
        }

        self.fetch_any_by_key(key)
            .await?
            .ok_or_else(|| StorageError::Operation(format!("updated record not found: {key}")))
    }

    async fn deactivate(&self, secret: &SecretKey) -> Result<Option<Link>> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET is_active = FALSE
            WHERE secret_key = ?
              AND is_active = TRUE
            "#,
        )
        .bind(secret.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            SELECT link_key, secret_key, target_url, is_active, clicks, created_at
            FROM links
            WHERE secret_key = ?
            LIMIT 1
            "#,
        )
        .bind(secret.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| link_from_row(&row)).transpose()
    }
}
