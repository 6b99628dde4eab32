//! Nonna notification service library
//!
//! Exposes the dispatch pipeline and server components for the binary and tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
