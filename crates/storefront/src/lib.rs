//! RocketShoes Storefront library.
//!
//! This crate provides the cart store and its HTTP surface as a library,
//! allowing them to be tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`cart`] - `CartStore`: validated, persisted cart mutations
//! - [`stock`] - Stock service clients (`StockOracle`)
//! - [`storage`] - Durable slots for the cart snapshot (`PersistentSlot`)
//! - [`notify`] - User-facing notification sinks
//! - [`routes`] - JSON cart API
//! - [`config`] / [`error`] / [`state`] - Application plumbing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod stock;
pub mod storage;
