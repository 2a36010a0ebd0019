//! Rust client library for the TableTop table-booking API.
//!
//! This crate provides a typed client for the TableTop restaurant
//! discovery and table-booking REST API: authentication with durable
//! session persistence, server-authoritative favorites
//! synchronization, the booking lifecycle, catalog search, reviews,
//! and role-based view guarding.

pub mod analytics;
pub mod client;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod storage;
pub mod table_top;
