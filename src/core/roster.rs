//! # Character Roster Store
//!
//! Process-wide state for the character list screen. State changes only
//! happen through `update(state, action)`, so every transition is a plain
//! function call that tests can drive directly.
//!
//! ```text
//! RosterState + RosterAction  →  update()  →  new RosterState
//! ```
//!
//! [`RosterStore`] wraps that reducer in an explicit container: `state()`,
//! `dispatch(action)`, `subscribe(listener)`. There is no ambient global;
//! whoever needs the store receives it by reference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::api::catalog::Catalog;
use crate::api::types::Character;

/// The roster screen's entire state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterState {
    /// Most recently fetched page of characters. Pages replace each other;
    /// nothing accumulates.
    pub characters: Vec<Character>,
    /// True only while the newest fetch is in flight.
    pub loading: bool,
    /// Message of the newest fetch's failure, cleared when a newer fetch
    /// starts.
    pub error: Option<String>,
}

/// Everything that can happen to the roster.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterAction {
    FetchStarted,
    FetchSucceeded(Vec<Character>),
    FetchFailed(String),
    ErrorCleared,
    Reset,
}

/// Pure reducer. No I/O in here.
pub fn update(state: &mut RosterState, action: RosterAction) {
    match action {
        RosterAction::FetchStarted => {
            state.loading = true;
            state.error = None;
        }
        RosterAction::FetchSucceeded(results) => {
            state.characters = results;
            state.loading = false;
        }
        RosterAction::FetchFailed(message) => {
            // Stale-but-visible beats an emptied screen: characters keep
            // their prior value on failure.
            state.loading = false;
            state.error = Some(message);
        }
        RosterAction::ErrorCleared => state.error = None,
        RosterAction::Reset => *state = RosterState::default(),
    }
}

type Listener = Box<dyn Fn(&RosterState) + Send + Sync>;

/// Explicit state container for [`RosterState`].
///
/// Concurrent `fetch_characters` calls follow a newest-call-wins policy:
/// each call takes a fresh generation, and a response is applied only while
/// its generation is still the newest. Superseded responses are discarded.
pub struct RosterStore {
    catalog: Arc<dyn Catalog>,
    state: Mutex<RosterState>,
    generation: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl RosterStore {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(RosterState::default()),
            generation: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RosterState {
        self.state_locked().clone()
    }

    /// Applies `action` through the reducer and notifies subscribers.
    pub fn dispatch(&self, action: RosterAction) {
        let snapshot = {
            let mut state = self.state_locked();
            update(&mut state, action);
            state.clone()
        };
        self.notify(&snapshot);
    }

    /// Registers a listener invoked after every dispatch with the new state.
    pub fn subscribe(&self, listener: impl Fn(&RosterState) + Send + Sync + 'static) {
        self.listeners_locked().push(Box::new(listener));
    }

    /// Fetches one page of characters and folds the outcome into state.
    pub async fn fetch_characters(&self, page: Option<u32>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatch(RosterAction::FetchStarted);

        let action = match self.catalog.characters(page).await {
            Ok(page) => RosterAction::FetchSucceeded(page.results),
            Err(err) => {
                warn!("character fetch failed: {err}");
                RosterAction::FetchFailed(err.to_string())
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding superseded roster fetch (generation {generation})");
            return;
        }
        self.dispatch(action);
    }

    pub fn clear_error(&self) {
        self.dispatch(RosterAction::ErrorCleared);
    }

    /// Restores the initial state. Also bumps the generation so an in-flight
    /// fetch cannot resurrect the cleared state.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.dispatch(RosterAction::Reset);
    }

    fn notify(&self, state: &RosterState) {
        for listener in self.listeners_locked().iter() {
            listener(state);
        }
    }

    fn state_locked(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners_locked(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::test_support::{sample_character, ScriptedFailure, StaticCatalog};

    #[test]
    fn test_fetch_started_sets_loading_and_clears_error() {
        let mut state = RosterState {
            error: Some("old failure".to_string()),
            ..RosterState::default()
        };
        update(&mut state, RosterAction::FetchStarted);
        assert!(state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_fetch_succeeded_replaces_the_page() {
        let mut state = RosterState {
            characters: vec![sample_character(1, 0)],
            loading: true,
            error: None,
        };
        update(
            &mut state,
            RosterAction::FetchSucceeded(vec![sample_character(2, 0), sample_character(3, 0)]),
        );
        assert_eq!(state.characters.len(), 2);
        assert_eq!(state.characters[0].id, 2);
        assert!(!state.loading);
    }

    #[test]
    fn test_fetch_failed_keeps_prior_characters() {
        let mut state = RosterState {
            characters: vec![sample_character(7, 0)],
            loading: true,
            error: None,
        };
        update(
            &mut state,
            RosterAction::FetchFailed("network unreachable".to_string()),
        );
        assert_eq!(state.characters.len(), 1);
        assert_eq!(state.characters[0].id, 7);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network unreachable"));
    }

    #[test]
    fn test_reset_restores_initial_values_regardless_of_prior_state() {
        let mut state = RosterState {
            characters: vec![sample_character(1, 3)],
            loading: true,
            error: Some("stuck".to_string()),
        };
        update(&mut state, RosterAction::Reset);
        assert_eq!(state, RosterState::default());
    }

    #[tokio::test]
    async fn test_fetch_characters_success_end_to_end() {
        let catalog = StaticCatalog::new()
            .with_characters(vec![sample_character(1, 2), sample_character(2, 0)]);
        let store = RosterStore::new(Arc::new(catalog));

        store.fetch_characters(None).await;

        let state = store.state();
        assert_eq!(state.characters.len(), 2);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_characters_failure_surfaces_a_message() {
        let catalog = StaticCatalog::new().failing_characters(ScriptedFailure::NetworkUnreachable);
        let store = RosterStore::new(Arc::new(catalog));

        store.fetch_characters(None).await;

        let state = store.state();
        assert!(state.characters.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network unreachable"));
    }

    #[tokio::test]
    async fn test_clear_error_only_touches_the_error() {
        let catalog = StaticCatalog::new().failing_characters(ScriptedFailure::Timeout);
        let store = RosterStore::new(Arc::new(catalog));
        store.fetch_characters(None).await;
        assert!(store.state().error.is_some());

        store.clear_error();

        let state = store.state();
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_dispatch() {
        let catalog = StaticCatalog::new().with_characters(vec![sample_character(1, 0)]);
        let store = RosterStore::new(Arc::new(catalog));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.fetch_characters(None).await;

        // FetchStarted and FetchSucceeded both notify.
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_fetch() {
        let catalog = Arc::new(
            StaticCatalog::new()
                .with_characters(vec![sample_character(1, 0)])
                .gated(),
        );
        let store = Arc::new(RosterStore::new(
            Arc::clone(&catalog) as Arc<dyn Catalog>
        ));

        let fetching = Arc::clone(&store);
        let handle = tokio::spawn(async move { fetching.fetch_characters(None).await });
        tokio::task::yield_now().await;

        store.reset();
        catalog.release();
        handle.await.unwrap();

        let state = store.state();
        assert!(state.characters.is_empty());
        assert!(!state.loading);
    }
}
