//! Parlor - a terminal messenger
//!
//! This library holds the running session of the client: the feature
//! modules, the coordinator that routes between them, and the boundaries
//! to the messaging engine and session storage.

// Core modules
pub mod app;
pub mod call;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod login;
pub mod messaging;
pub mod modules;
pub mod session;
pub mod styles;
pub mod tui;
pub mod utils;
pub mod widgets;

// Re-exports for convenience
pub use config::Config;
pub use coordinator::{CoordinatorAction, RunningCoordinator};
pub use messaging::MessagingService;
pub use session::{ConfigSessionStore, SessionStore};
