//! Library crate for userdesk.
//!
//! This crate exposes the building blocks of the TUI:
//! - Users backend seam, HTTP client and in-memory stand-in (`api`)
//! - Application state and update loop (`app`)
//! - Error and result types (`error`)
//! - User record types (`model`)
//! - Local mirror of the remote users collection (`sync`)
//! - UI rendering (`ui`)
//!
//! It is used by the `userdesk` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod model;
pub mod sync;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::{Result, SyncError};
pub use model::{UserDraft, UserRecord};
pub use sync::UserListSynchronizer;
