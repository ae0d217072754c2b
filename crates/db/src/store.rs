//! Store interface used by the author lookup handler.

use async_trait::async_trait;
use thiserror::Error;

/// Author row projection: everything but the identifier the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorRecord {
    pub name: String,
    pub biography: String,
}

/// Book row produced by the attribution join.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BookRecord {
    pub title: String,
    pub year: i32,
}

/// Outcome of a single-row lookup.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(DbError),
}

/// Data access failures. None of these messages are meant for clients.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to acquire a database connection")]
    Connect(#[source] sqlx::Error),

    #[error("{operation} failed")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration {module}/{id} failed")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    pub fn query(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Query { operation, source }
    }
}

/// Source of per-request connections.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Acquire a connection; it is released when the returned box is dropped.
    async fn connect(&self) -> Result<Box<dyn AuthorConnection>, DbError>;
}

/// Queries available on an acquired connection.
#[async_trait]
pub trait AuthorConnection: Send {
    async fn fetch_author(&mut self, id: i64) -> Lookup<AuthorRecord>;

    /// Books attributed to the author, in store order. Empty is not an error.
    async fn fetch_books(&mut self, author_id: i64) -> Result<Vec<BookRecord>, DbError>;
}
