//! In-memory gateways and a ready-made test server for handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;

use crate::config::Config;
use crate::db::{DbError, FileRepository};
use crate::models::{AppState, FileRecord};
use crate::routes::create_router;
use crate::storage::{public_url, ObjectStorage, StorageError};

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Copy)]
pub enum StorageFailure {
    Connect,
    Upload,
}

#[derive(Debug, Clone, Copy)]
pub enum DbFailure {
    Connect,
    Query,
    Panic,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    puts: Mutex<usize>,
    failure: Option<StorageFailure>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failure: StorageFailure) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(failure),
            ..Default::default()
        })
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        match self.failure {
            Some(StorageFailure::Connect) => {
                return Err(StorageError::Connect("no credentials".into()))
            }
            Some(StorageFailure::Upload) => {
                return Err(StorageError::Upload("connection reset".into()))
            }
            None => {}
        }

        *self.puts.lock().unwrap() += 1;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        public_url(TEST_BUCKET, TEST_REGION, key)
    }
}

#[derive(Default)]
pub struct MemoryFiles {
    rows: Mutex<Vec<FileRecord>>,
    failure: Option<DbFailure>,
}

impl MemoryFiles {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failure: DbFailure) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(failure),
            ..Default::default()
        })
    }

    pub fn with_rows(rows: Vec<FileRecord>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            failure: None,
        })
    }

    pub fn rows(&self) -> Vec<FileRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), DbError> {
        match self.failure {
            Some(DbFailure::Connect) => Err(DbError::Connect(sqlx::Error::PoolTimedOut)),
            Some(DbFailure::Query) => Err(DbError::Query(sqlx::Error::Protocol(
                "table files doesn't exist".to_string(),
            ))),
            Some(DbFailure::Panic) => panic!("repository exploded"),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FileRepository for MemoryFiles {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), DbError> {
        self.check()?;
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_file(&self, filename: &str) -> Result<Option<FileRecord>, DbError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.filename == filename)
            .cloned())
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("S3_BUCKET", TEST_BUCKET),
        ("S3_REGION", TEST_REGION),
        ("DB_HOST", "localhost"),
        ("DB_NAME", "uploads"),
        ("DB_USER", "test"),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config is complete")
}

pub fn test_server(storage: Arc<MemoryStorage>, files: Arc<MemoryFiles>) -> TestServer {
    test_server_with(storage, files, |_| {})
}

pub fn test_server_with<F>(
    storage: Arc<MemoryStorage>,
    files: Arc<MemoryFiles>,
    configure: F,
) -> TestServer
where
    F: FnOnce(&mut Config),
{
    let mut config = test_config();
    configure(&mut config);

    let state = AppState {
        config: Arc::new(config),
        storage,
        files,
    };

    TestServer::new(create_router(state)).expect("failed to start test server")
}
