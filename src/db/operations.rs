use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use super::{DbError, FileRepository};
use crate::config::DatabaseConfig;
use crate::models::FileRecord;

const INSERT_FILE: &str = "INSERT INTO files (filename, file_url) VALUES (?, ?)";
const SELECT_FILE: &str = "SELECT filename, file_url FROM files WHERE filename = ? LIMIT 1";

/// MySQL-backed repository. Opens one connection per operation.
#[derive(Debug, Clone)]
pub struct MySqlFileRepository {
    options: MySqlConnectOptions,
}

impl MySqlFileRepository {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        Self { options }
    }

    /// Connects, runs `op`, then closes the connection whether `op` failed or not.
    pub async fn with_connection<T, F>(&self, op: F) -> Result<T, DbError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut MySqlConnection) -> BoxFuture<'c, Result<T, sqlx::Error>>
            + Send,
    {
        let mut conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(DbError::Connect)?;
        debug!("database connection opened");

        let result = op(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close database connection cleanly");
        }

        result.map_err(DbError::Query)
    }
}

#[async_trait]
impl FileRepository for MySqlFileRepository {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), DbError> {
        let filename = record.filename.clone();
        let file_url = record.file_url.clone();

        self.with_connection(move |conn| {
            Box::pin(async move {
                sqlx::query(INSERT_FILE)
                    .bind(filename)
                    .bind(file_url)
                    .execute(conn)
                    .await?;
                Ok(())
            })
        })
        .await
    }

    async fn find_file(&self, filename: &str) -> Result<Option<FileRecord>, DbError> {
        let filename = filename.to_string();

        self.with_connection(move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, FileRecord>(SELECT_FILE)
                    .bind(filename)
                    .fetch_optional(conn)
                    .await
            })
        })
        .await
    }
}
