//! Stride Core - Shared domain types.
//!
//! This crate provides the domain model shared across all Stride components:
//! - `client` - Client-side state layer (stores, API services)
//! - `integration-tests` - Cross-store scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Everything here is computable from data already in
//! memory, which is what keeps derived views (filtering, sorting, search)
//! network-free.
//!
//! # Modules
//!
//! - [`types`] - Products, carts, orders, and the filter/sort vocabulary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
