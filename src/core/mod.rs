//! Core logic: scroll-driven animation, helix layout, and the project
//! data layer.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod actions;
pub mod auth;
pub mod curve;
pub mod db;
pub mod error;
pub mod helix;
pub mod presence;
pub mod project;
pub mod repo;
pub mod scroll;
pub mod sections;
pub mod smooth_scroll;
pub mod spring;
pub mod store;
