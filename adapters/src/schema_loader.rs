//! Schema Loader
//!
//! Retrieves a schema document and parses it. Remote documents are fetched
//! with a single GET; local documents are read from disk. There is no retry:
//! any failure is returned to the caller as-is.

use location::SchemaLocation;
use schema::SourceSchema;
use serde_json::Value;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
/// Errors that can occur while loading a schema
pub enum LoadError {
    /// The document could not be retrieved
    #[error("failed to fetch schema from {location}: {source}")]
    Fetch {
        /// Location as given by the caller
        location: String,
        /// Underlying transport or I/O failure
        #[source]
        source: BoxError,
    },
    /// The document is not well-formed JSON
    #[error("failed to parse schema from {location}: {source}")]
    Parse {
        /// Location as given by the caller
        location: String,
        /// JSON syntax error
        #[source]
        source: serde_json::Error,
    },
    /// The document is JSON but not a schema object
    #[error("schema from {location} has an unexpected shape: {source}")]
    Shape {
        /// Location as given by the caller
        location: String,
        /// Structural mismatch reported by serde
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for schema loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Fetches and parses resource-provider schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    client: reqwest::Client,
}

impl SchemaLoader {
    /// Create a loader with a default HTTP client.
    pub fn new() -> Self { Self { client: reqwest::Client::new() } }

    /// Create a loader that reuses an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self { Self { client } }

    /// Retrieve and parse the schema at `location`.
    pub async fn load(&self, location: &SchemaLocation) -> LoadResult<SourceSchema> {
        let content = self.fetch(location).await?;
        parse_schema(&location.to_string(), &content)
    }

    /// Retrieve the raw document text.
    pub async fn fetch(&self, location: &SchemaLocation) -> LoadResult<String> {
        let fetch_error = |source: BoxError| LoadError::Fetch { location: location.to_string(), source };

        match location {
            SchemaLocation::Remote(url) => {
                logging::trace("loader", &format!("→ GET {}", url));
                let response = self
                    .client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| fetch_error(Box::new(e)))?;
                response.text().await.map_err(|e| fetch_error(Box::new(e)))
            }
            SchemaLocation::Local(path) => {
                logging::trace("loader", &format!("→ reading {}", path.display()));
                tokio::fs::read_to_string(path).await.map_err(|e| fetch_error(Box::new(e)))
            }
        }
    }
}

/// Parse schema text fetched from `location`.
///
/// Malformed JSON is a [`LoadError::Parse`]; well-formed JSON that is not a
/// schema object (an array, a string, a `properties` that is not a map, ...)
/// is a [`LoadError::Shape`].
pub fn parse_schema(location: &str, content: &str) -> LoadResult<SourceSchema> {
    let value: Value = serde_json::from_str(content)
        .map_err(|source| LoadError::Parse { location: location.to_string(), source })?;
    serde_json::from_value(value)
        .map_err(|source| LoadError::Shape { location: location.to_string(), source })
}
