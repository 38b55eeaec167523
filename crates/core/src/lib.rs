//! Pricewatch Core - Shared types library.
//!
//! This crate provides common types used across all Pricewatch components:
//! - `admin` - Server-rendered admin panel and price-change handler
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the record [`types::Changeset`], and
//!   trailing-window date arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
