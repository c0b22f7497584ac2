//! # Profile Orchestrator
//!
//! Per-profile controller sequencing the two dependent fetches behind the
//! profile screen: the character itself, then the episodes it appears in.
//! The primary lifecycle is a four-state machine; episode loading rides on
//! a secondary flag so a slow episode fetch never blocks the profile from
//! rendering.
//!
//! ```text
//! start ──► Loading ──► Success ──(episodes fetched independently)
//!              │
//!              ├──────► NotFound   (terminal for this id)
//!              └──────► Error ──retry()──► Loading
//! ```
//!
//! Every `load()` takes a fresh fetch token. State writes re-check the
//! token, so a response that arrives after `invalidate()` (navigating away)
//! or after a newer `load()` is discarded instead of written into a dead
//! screen's state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};
use uuid::Uuid;

use crate::api::catalog::Catalog;
use crate::api::client::ApiError;
use crate::api::types::{Character, Episode};

/// Upper bound on episodes fetched for one profile, however many the
/// character appears in. Fixed policy, not configurable.
pub const EPISODE_FETCH_LIMIT: usize = 10;

/// Primary lifecycle stage of a profile screen. The stages are mutually
/// exclusive; episode loading is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePhase {
    /// Initial stage, re-entered on every fetch attempt including retries.
    Loading,
    /// Character resolved. Episodes may still be loading independently.
    Success,
    /// Character fetch failed for a reason other than absence. Retryable.
    Error,
    /// The id does not exist upstream. Terminal; only navigating away leaves
    /// this stage.
    NotFound,
}

/// Everything the profile screen renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub phase: ProfilePhase,
    pub character: Option<Character>,
    /// At most [`EPISODE_FETCH_LIMIT`] entries, ordered like the character's
    /// episode locators.
    pub episodes: Vec<Episode>,
    pub episodes_loading: bool,
    /// Failure of the episode fetch after a successful character fetch. The
    /// primary phase stays `Success`; the screen decides how to surface it.
    pub episodes_error: Option<String>,
    pub error: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            phase: ProfilePhase::Loading,
            character: None,
            episodes: Vec::new(),
            episodes_loading: false,
            episodes_error: None,
            error: None,
        }
    }
}

struct Inner {
    state: ProfileState,
    /// Token of the load() whose writes are currently welcome. `None` after
    /// `invalidate()`.
    active_token: Option<Uuid>,
}

pub struct ProfileOrchestrator {
    catalog: Arc<dyn Catalog>,
    character_id: u32,
    inner: Mutex<Inner>,
}

impl ProfileOrchestrator {
    pub fn new(catalog: Arc<dyn Catalog>, character_id: u32) -> Self {
        Self {
            catalog,
            character_id,
            inner: Mutex::new(Inner {
                state: ProfileState::default(),
                active_token: None,
            }),
        }
    }

    pub fn character_id(&self) -> u32 {
        self.character_id
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ProfileState {
        self.locked().state.clone()
    }

    /// Runs the full fetch sequence: character first, then its episodes.
    /// The episode fetch starts strictly after the character resolves and
    /// never blocks the transition to `Success`.
    pub async fn load(&self) {
        let token = Uuid::new_v4();
        {
            let mut inner = self.locked();
            inner.active_token = Some(token);
            inner.state.phase = ProfilePhase::Loading;
            inner.state.error = None;
            inner.state.episodes_error = None;
        }

        let character = match self.catalog.character(self.character_id).await {
            Ok(character) => character,
            Err(ApiError::NotFound) => {
                debug!("character {} does not exist upstream", self.character_id);
                self.write_if_current(token, |state| {
                    state.phase = ProfilePhase::NotFound;
                    state.error = Some("character not found".to_string());
                });
                return;
            }
            Err(err) => {
                warn!("character {} fetch failed: {err}", self.character_id);
                self.write_if_current(token, |state| {
                    state.phase = ProfilePhase::Error;
                    state.error = Some(err.to_string());
                });
                return;
            }
        };

        let episode_ids = derive_episode_ids(&character.episode);
        let has_episodes = !episode_ids.is_empty();
        let current = self.write_if_current(token, |state| {
            state.phase = ProfilePhase::Success;
            state.character = Some(character);
            state.episodes_loading = has_episodes;
        });
        // A stale token means the screen is gone or a newer load took over;
        // fetching its episodes would be work nobody reads.
        if !current || !has_episodes {
            return;
        }

        match self.catalog.episodes_by_ids(&episode_ids).await {
            Ok(episodes) => {
                self.write_if_current(token, |state| {
                    state.episodes = episodes;
                    state.episodes_loading = false;
                });
            }
            Err(err) => {
                warn!(
                    "episode fetch for character {} failed: {err}",
                    self.character_id
                );
                self.write_if_current(token, |state| {
                    state.episodes_loading = false;
                    state.episodes_error = Some(err.to_string());
                });
            }
        }
    }

    /// User-triggered retry. Re-runs the full sequence, except from
    /// `NotFound`, which has no retry path for the current id.
    pub async fn retry(&self) {
        if self.state().phase == ProfilePhase::NotFound {
            debug!(
                "retry ignored for character {}: absent upstream",
                self.character_id
            );
            return;
        }
        self.load().await;
    }

    /// Drops the current fetch token. A `load()` still in flight will finish
    /// its requests but write nothing. Called when the screen goes away.
    pub fn invalidate(&self) {
        self.locked().active_token = None;
    }

    /// Applies `write` only while `token` is still the active one. Returns
    /// whether the write happened.
    fn write_if_current(&self, token: Uuid, write: impl FnOnce(&mut ProfileState)) -> bool {
        let mut inner = self.locked();
        if inner.active_token != Some(token) {
            debug!(
                "discarding stale profile response for character {}",
                self.character_id
            );
            return false;
        }
        write(&mut inner.state);
        true
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Accepts exactly the locators ending in `/episode/<integer>` and yields
/// the integer. Everything else is rejected.
fn parse_episode_locator(url: &str) -> Option<u32> {
    let (head, id) = url.rsplit_once('/')?;
    if !head.ends_with("/episode") {
        return None;
    }
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Derives the episode ids to fetch for a profile: locators failing
/// [`parse_episode_locator`] are filtered out, order is preserved, and the
/// result is capped at [`EPISODE_FETCH_LIMIT`] before any request is made.
pub fn derive_episode_ids(locators: &[String]) -> Vec<u32> {
    locators
        .iter()
        .filter_map(|locator| parse_episode_locator(locator))
        .take(EPISODE_FETCH_LIMIT)
        .collect()
}
