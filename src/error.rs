use std::collections::BTreeMap;
use std::fmt;

use crate::models::ProductId;

/// Failures at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("fetch failed: {0}")]
    Fetch(#[source] ApiError),

    #[error("add failed: {0}")]
    Add(#[source] ApiError),

    #[error("update failed: {0}")]
    Update(#[source] ApiError),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        match self {
            RepositoryError::NotFound(_) => true,
            RepositoryError::Fetch(err) | RepositoryError::Add(err) | RepositoryError::Update(err) => {
                err.is_not_found()
            }
            RepositoryError::Validation(_) => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("stock edit is closed")]
    Closed,

    #[error("failed to update stock quantity: {0}")]
    Submit(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no warehouseman matches that secret key")]
    InvalidSecretKey,

    #[error("unable to connect to server: {0}")]
    Unavailable(#[from] ApiError),

    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Client-side validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        write!(f, "invalid input ({})", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
