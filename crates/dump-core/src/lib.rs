//! dump-core - Core library for The Dump
//!
//! Typed client for The Dump's REST API and the state machines the
//! capture, browse, onboarding, and subscription screens are built on.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod presets;
pub mod state;
pub mod storage;
pub mod util;

pub use api::{DumpClient, MediaApi, NotesApi, UsageApi};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
