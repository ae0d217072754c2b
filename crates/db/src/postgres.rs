//! PostgreSQL implementation of [`AuthorStore`].

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, Postgres};

use crate::store::{AuthorConnection, AuthorRecord, AuthorStore, BookRecord, DbError, Lookup};

pub(crate) const AUTHOR_QUERY: &str = "SELECT name, biography FROM author WHERE id = $1";

// Attribution is its own relation; keep the left join even though the
// author filter makes it behave like an inner join today.
pub(crate) const BOOKS_QUERY: &str = "SELECT book.title, book.year FROM book \
     LEFT JOIN attribution ON attribution.book_id = book.id \
     WHERE attribution.author_id = $1";

/// Author store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgAuthorStore {
    pool: PgPool,
}

impl PgAuthorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for PgAuthorStore {
    async fn connect(&self) -> Result<Box<dyn AuthorConnection>, DbError> {
        let conn = self.pool.acquire().await.map_err(DbError::Connect)?;
        Ok(Box::new(PgAuthorConnection { conn }))
    }
}

struct PgAuthorConnection {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl AuthorConnection for PgAuthorConnection {
    async fn fetch_author(&mut self, id: i64) -> Lookup<AuthorRecord> {
        let row = sqlx::query_as::<_, AuthorRecord>(AUTHOR_QUERY)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await;

        match row {
            Ok(Some(author)) => Lookup::Found(author),
            Ok(None) => Lookup::NotFound,
            Err(err) => Lookup::Failed(DbError::query("author lookup", err)),
        }
    }

    async fn fetch_books(&mut self, author_id: i64) -> Result<Vec<BookRecord>, DbError> {
        // fetch_all stops at the first row that fails to decode.
        sqlx::query_as::<_, BookRecord>(BOOKS_QUERY)
            .bind(author_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|err| DbError::query("book lookup", err))
    }
}
