use crate::error::Result;
use futures_util::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// String-keyed persistence. Everything the engine stores goes through this
/// one table, so a storage failure is always visible at the call site.
pub struct KvStore {
    pub pool: SqlitePool,
}

impl KvStore {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening kv store at {:?}", path);
        let raw = path.to_str().unwrap_or_default();
        if !raw.starts_with("sqlite:") && !path.exists() {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs_err::create_dir_all(dir)?;
                }
            }
        }
        let options = SqliteConnectOptions::from_str(raw)?.create_if_missing(true);
        // Single local writer; one connection also keeps ":memory:" databases
        // coherent across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::setup_db(&pool).await?;

        Ok(Self { pool })
    }

    async fn setup_db(pool: &SqlitePool) -> Result<()> {
        debug!("setting up kv store");
        sqlx::query(
            r#"
            create table if not exists kv(
                key text primary key,
                value text not null
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let res: Option<String> = sqlx::query_scalar("select value from kv where key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(res)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            insert into kv(key, value) values(?1, ?2)
            on conflict(key) do update set value = ?2
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("delete from kv where key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let res = sqlx::query_scalar("select key from kv order by key")
            .fetch(&self.pool)
            .try_collect()
            .await?;

        Ok(res)
    }

    pub async fn remove_many(&self, keys: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("delete from kv where key = ?1")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
