//! # Core Application Logic
//!
//! Client-side state for the catalog browser.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • roster store         │
//!                    │  • profile orchestrator │
//!                    │  • config               │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │   Mobile   │      │    TUI     │
//!     │  Adapter   │      │  Adapter   │      │  (future)  │
//!     │ (main.rs)  │      │  (future)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`roster`]: the character-list state container and its reducer
//! - [`profile`]: the per-profile fetch orchestrator and its state machine
//! - [`config`]: layered settings resolution

pub mod config;
pub mod profile;
pub mod roster;

// Re-export commonly used types for convenience
// pub use profile::ProfileOrchestrator;
// pub use roster::RosterStore;
