//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart store, collaborators, and the HTTP cart surface
//! - `cli` - Command-line cart driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! Every cart transformation here returns a new value; the store decides
//! when to commit it.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, line items, carts, stock records, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
