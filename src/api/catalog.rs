//! Typed facade over the five catalog operations.
//!
//! [`Catalog`] is the seam the store and orchestrator depend on; tests swap
//! in fakes behind it. [`CatalogClient`] is the real implementation over
//! [`ApiClient`]. Errors pass through unclassified and uncaught: the layers
//! above convert them into state.

use async_trait::async_trait;

use super::client::{ApiClient, ApiError};
use super::types::{Character, Episode, Location, Page};

#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of characters. `page` is 1-based; `None` means the API's
    /// default (the first page).
    async fn characters(&self, page: Option<u32>) -> Result<Page<Character>, ApiError>;

    /// A single character. Fails with [`ApiError::NotFound`] when the remote
    /// has no such id.
    async fn character(&self, id: u32) -> Result<Character, ApiError>;

    /// One page of locations.
    async fn locations(&self, page: Option<u32>) -> Result<Page<Location>, ApiError>;

    /// One page of episodes.
    async fn episodes(&self, page: Option<u32>) -> Result<Page<Episode>, ApiError>;

    /// Episodes for `ids`, in the same order as `ids`. Always returns a
    /// sequence, whatever shape the remote responds with.
    async fn episodes_by_ids(&self, ids: &[u32]) -> Result<Vec<Episode>, ApiError>;
}

pub struct CatalogClient {
    http: ApiClient,
}

impl CatalogClient {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }
}

fn page_query(page: Option<u32>) -> Vec<(&'static str, String)> {
    page.map(|p| vec![("page", p.to_string())]).unwrap_or_default()
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn characters(&self, page: Option<u32>) -> Result<Page<Character>, ApiError> {
        self.http.get("character", &page_query(page)).await
    }

    async fn character(&self, id: u32) -> Result<Character, ApiError> {
        self.http.get(&format!("character/{id}"), &[]).await
    }

    async fn locations(&self, page: Option<u32>) -> Result<Page<Location>, ApiError> {
        self.http.get("location", &page_query(page)).await
    }

    async fn episodes(&self, page: Option<u32>) -> Result<Page<Episode>, ApiError> {
        self.http.get("episode", &page_query(page)).await
    }

    async fn episodes_by_ids(&self, ids: &[u32]) -> Result<Vec<Episode>, ApiError> {
        match ids {
            // An empty id list would produce an invalid path; short-circuit
            // without touching the network.
            [] => Ok(Vec::new()),
            // The remote returns a bare object for a single id and an array
            // for several. Normalize both shapes to a Vec here.
            [id] => {
                let episode: Episode = self.http.get(&format!("episode/{id}"), &[]).await?;
                Ok(vec![episode])
            }
            many => {
                let joined = many
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                self.http.get(&format!("episode/{joined}"), &[]).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_forwards_the_page_verbatim() {
        assert_eq!(page_query(Some(3)), vec![("page", "3".to_string())]);
        assert!(page_query(None).is_empty());
    }
}
