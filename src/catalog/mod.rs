pub mod browse;
pub mod client;
pub mod gateway;
pub mod types;

use thiserror::Error;

pub use browse::BrowseQuery;
pub use client::{AdminProfile, CatalogClient, Credentials};
pub use gateway::{CatalogView, ProductCatalog};
pub use types::{
    Category, PageRequest, ProductDraft, ProductPage, ProductRecord, SortOrder, SortSpec,
};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("Failed to validate: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Invalid catalog url: {0}")]
    InvalidUrl(String),
}
