pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;
use shelf_db::AuthorStore;
use shelf_kernel::{InitCtx, Migration, Module};

/// Read-only author lookup, mounted at `/api/authors`
pub struct AuthorsModule {
    store: Arc<dyn AuthorStore>,
}

impl AuthorsModule {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{author_id}", get(handlers::get_author))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/{author_id}": {
                    "get": {
                        "summary": "Get an author and their books",
                        "tags": ["Authors"],
                        "parameters": [{
                            "name": "author_id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Author with attributed books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorWithBooks" }
                                    }
                                }
                            },
                            "400": error("Author id is not an integer"),
                            "404": error("No author with this id"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "year": { "type": "integer", "format": "int32" }
                        },
                        "required": ["title", "year"]
                    },
                    "AuthorWithBooks": {
                        "type": "object",
                        "properties": {
                            "author_id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" },
                            "biography": { "type": "string" },
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["author_id", "name", "biography", "books"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS author (
                    id        BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                    name      TEXT NOT NULL,
                    biography TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS book (
                    id    BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                    title TEXT NOT NULL,
                    year  INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS attribution (
                    book_id   BIGINT NOT NULL REFERENCES book (id),
                    author_id BIGINT NOT NULL REFERENCES author (id),
                    PRIMARY KEY (book_id, author_id)
                );
                CREATE INDEX IF NOT EXISTS attribution_author_id_idx ON attribution (author_id);
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(store: Arc<dyn AuthorStore>) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(store))
}
