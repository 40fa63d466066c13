//! Error types shared by the fetchers and the catalog

use thiserror::Error;

/// Failure of a rate or history fetch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request could not complete: transport failure or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream answered, but the response signals failure or is unusable.
    #[error("API error: {0}")]
    Api(String),
}

impl FetchError {
    pub fn network(reason: impl std::fmt::Display) -> Self {
        FetchError::Network(reason.to_string())
    }

    pub fn api(reason: impl std::fmt::Display) -> Self {
        FetchError::Api(reason.to_string())
    }
}

/// Failure to build or consult the currency catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Invalid currency code '{0}': expected three uppercase ASCII letters")]
    InvalidCode(String),

    #[error("Duplicate currency code in catalog: {0}")]
    DuplicateCode(String),
}
