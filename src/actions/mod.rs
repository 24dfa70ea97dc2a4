//! Background actions for interactive callers
//!
//! Provides one spawned task per user action with:
//! - A handle to await the result or stop waiting on it
//! - Status events (`started`, `succeeded`, `failed`) on a channel so errors
//!   reach the caller instead of vanishing with the task

mod types;
mod worker;

pub use types::{ActionEvent, ActionKind, ActionStatus};
pub use worker::{ActionHandle, ActionRunner};
