//! Common test utilities and helpers
//!
//! This module provides shared functionality for all tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

pub use db::TestDb;
pub use fixtures::{photo_upload_request, RequestBuilder};
pub use mocks::{InMemoryStore, ProviderBehavior, RecordingProvider};
