use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelf_db::{AuthorStore, Lookup};
use shelf_http::{respond_with_json, ApiError};

use super::models::AuthorWithBooks;

pub const INVALID_AUTHOR_ID: &str = "invalid author id";
pub const AUTHOR_NOT_FOUND: &str = "author not found";

/// `GET /api/authors/{author_id}`
///
/// A segment that does not even decode to UTF-8 is just another invalid id.
pub async fn get_author(
    State(store): State<Arc<dyn AuthorStore>>,
    author_id: Result<Path<String>, PathRejection>,
) -> Response {
    let Ok(Path(author_id)) = author_id else {
        return ApiError::bad_request(INVALID_AUTHOR_ID).into_response();
    };

    match lookup_author(store.as_ref(), &author_id).await {
        Ok(author) => respond_with_json(StatusCode::OK, &author),
        Err(err) => err.into_response(),
    }
}

/// Resolve an author and their books from the raw path segment.
///
/// The connection is held only for the duration of this call and is released
/// on every return path when `conn` drops.
pub async fn lookup_author(
    store: &dyn AuthorStore,
    raw_author_id: &str,
) -> Result<AuthorWithBooks, ApiError> {
    let author_id: i64 = raw_author_id
        .parse()
        .map_err(|_| ApiError::bad_request(INVALID_AUTHOR_ID))?;

    let mut conn = store
        .connect()
        .await
        .map_err(|err| ApiError::internal(err, "connecting to the author store"))?;

    let author = match conn.fetch_author(author_id).await {
        Lookup::Found(author) => author,
        Lookup::NotFound => return Err(ApiError::not_found(AUTHOR_NOT_FOUND)),
        Lookup::Failed(err) => return Err(ApiError::internal(err, "fetching author")),
    };

    let books = conn
        .fetch_books(author_id)
        .await
        .map_err(|err| ApiError::internal(err, "fetching books"))?;

    tracing::debug!(author_id, books = books.len(), "author resolved");
    Ok(AuthorWithBooks::assemble(author_id, author, books))
}
