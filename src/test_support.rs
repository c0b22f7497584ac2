//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::catalog::Catalog;
use crate::api::client::ApiError;
use crate::api::types::{
    Character, CharacterStatus, Episode, Location, Page, PageInfo, ResourceRef,
};

/// Failure a [`StaticCatalog`] can be scripted to produce.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedFailure {
    Timeout,
    NotFound,
    NetworkUnreachable,
    Other,
}

impl ScriptedFailure {
    fn to_error(self) -> ApiError {
        match self {
            ScriptedFailure::Timeout => ApiError::Timeout,
            ScriptedFailure::NotFound => ApiError::NotFound,
            ScriptedFailure::NetworkUnreachable => ApiError::NetworkUnreachable,
            ScriptedFailure::Other => ApiError::Other {
                status: Some(500),
                message: "scripted failure".to_string(),
            },
        }
    }
}

/// Scripted failure plus whether it expires after the first hit.
struct FailurePlan {
    failure: ScriptedFailure,
    once: bool,
}

/// In-memory [`Catalog`] for tests that don't need a real HTTP server.
///
/// Responses come from the supplied fixtures, failures can be scripted per
/// operation, and every call is counted so tests can assert how many
/// requests an operation issued. `gated()` makes character fetches wait for
/// an explicit [`release`](StaticCatalog::release), which lets tests hold a
/// fetch in flight while they race something against it.
pub struct StaticCatalog {
    characters: Vec<Character>,
    episodes: Vec<Episode>,
    character_failure: Mutex<Option<FailurePlan>>,
    episode_failure: Mutex<Option<FailurePlan>>,
    pub character_requests: AtomicUsize,
    pub episode_requests: AtomicUsize,
    gate: Option<Semaphore>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            episodes: Vec::new(),
            character_failure: Mutex::new(None),
            episode_failure: Mutex::new(None),
            character_requests: AtomicUsize::new(0),
            episode_requests: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_characters(mut self, characters: Vec<Character>) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_episodes(mut self, episodes: Vec<Episode>) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn failing_characters(self, failure: ScriptedFailure) -> Self {
        *self.character_failure.lock().unwrap() = Some(FailurePlan {
            failure,
            once: false,
        });
        self
    }

    pub fn failing_characters_once(self, failure: ScriptedFailure) -> Self {
        *self.character_failure.lock().unwrap() = Some(FailurePlan {
            failure,
            once: true,
        });
        self
    }

    pub fn failing_episodes(self, failure: ScriptedFailure) -> Self {
        *self.episode_failure.lock().unwrap() = Some(FailurePlan {
            failure,
            once: false,
        });
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Lets one gated character fetch through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    async fn wait_at_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn take_scripted(&self, slot: &Mutex<Option<FailurePlan>>) -> Option<ApiError> {
        let mut plan = slot.lock().unwrap();
        match plan.as_ref() {
            Some(p) => {
                let error = p.failure.to_error();
                if p.once {
                    *plan = None;
                }
                Some(error)
            }
            None => None,
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn characters(&self, _page: Option<u32>) -> Result<Page<Character>, ApiError> {
        self.wait_at_gate().await;
        if let Some(error) = self.take_scripted(&self.character_failure) {
            return Err(error);
        }
        Ok(page_of(self.characters.clone()))
    }

    async fn character(&self, id: u32) -> Result<Character, ApiError> {
        self.wait_at_gate().await;
        self.character_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.take_scripted(&self.character_failure) {
            return Err(error);
        }
        self.characters
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn locations(&self, _page: Option<u32>) -> Result<Page<Location>, ApiError> {
        Ok(page_of(Vec::new()))
    }

    async fn episodes(&self, _page: Option<u32>) -> Result<Page<Episode>, ApiError> {
        Ok(page_of(self.episodes.clone()))
    }

    async fn episodes_by_ids(&self, ids: &[u32]) -> Result<Vec<Episode>, ApiError> {
        self.episode_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.take_scripted(&self.episode_failure) {
            return Err(error);
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.episodes.iter().find(|e| e.id == *id).cloned())
            .collect())
    }
}

fn page_of<T>(results: Vec<T>) -> Page<T> {
    Page {
        info: PageInfo {
            count: results.len() as u32,
            pages: 1,
            next: None,
            prev: None,
        },
        results,
    }
}

/// A character whose episode list holds `episode_count` well-formed
/// locators numbered from 1.
pub fn sample_character(id: u32, episode_count: usize) -> Character {
    Character {
        id,
        name: format!("Character {id}"),
        status: CharacterStatus::Alive,
        species: "Human".to_string(),
        gender: Some("Female".to_string()),
        origin: ResourceRef {
            name: "Earth (C-137)".to_string(),
            url: "https://example.com/api/location/1".to_string(),
        },
        location: ResourceRef {
            name: "Citadel of Ricks".to_string(),
            url: "https://example.com/api/location/3".to_string(),
        },
        image: format!("https://example.com/api/character/avatar/{id}.jpeg"),
        episode: (1..=episode_count as u32)
            .map(|n| format!("https://example.com/api/episode/{n}"))
            .collect(),
        created: "2017-11-04T18:48:46.250Z".to_string(),
    }
}

pub fn sample_episode(id: u32) -> Episode {
    Episode {
        id,
        name: format!("Episode {id}"),
        episode: format!("S01E{id:02}"),
        air_date: "December 2, 2013".to_string(),
        characters: Vec::new(),
    }
}
