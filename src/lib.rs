//! Core library surface for the Player Roster TUI.
//!
//! The binary only wires these pieces together; everything with behavior
//! lives here so it can be exercised without a terminal.
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod seed;
pub mod store;
pub mod ui;

/// The domain types every layer passes around.
pub use models::{PlayerField, PlayerFields, PlayerId, PlayerRecord};

/// Roster state and the single dispatcher that mutates it.
pub use command::{dispatch, Command, Feedback};
pub use store::{CommitOutcome, DraftState, RecordStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
