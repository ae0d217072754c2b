use serde::{Deserialize, Serialize};
use shelf_db::{AuthorRecord, BookRecord};

/// A book as listed under its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    /// Publication year
    pub year: i32,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            title: record.title,
            year: record.year,
        }
    }
}

/// Response body for `GET /api/authors/{author_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWithBooks {
    /// Identifier as requested by the caller
    pub author_id: i64,
    pub name: String,
    pub biography: String,
    /// Store order; serialized as `[]` when the author has no books
    pub books: Vec<Book>,
}

impl AuthorWithBooks {
    pub fn assemble(author_id: i64, author: AuthorRecord, books: Vec<BookRecord>) -> Self {
        Self {
            author_id,
            name: author.name,
            biography: author.biography,
            books: books.into_iter().map(Book::from).collect(),
        }
    }
}
