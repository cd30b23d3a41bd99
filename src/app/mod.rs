//! Application orchestration: state management, per-frame stage, event
//! plumbing, and input handling.

pub mod event;
pub mod handler;
pub mod stage;
pub mod state;
pub mod thumb_runtime;
