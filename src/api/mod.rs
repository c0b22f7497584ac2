pub mod catalog;
pub mod client;
pub mod types;

pub use catalog::{Catalog, CatalogClient};
pub use client::{ApiClient, ApiError, REQUEST_TIMEOUT};
pub use types::{
    Character, CharacterStatus, Episode, Location, Page, PageInfo, ResourceRef, PAGE_SIZE,
};
