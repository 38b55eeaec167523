//! Pricewatch Admin library.
//!
//! This crate provides the admin functionality as a library, allowing it to
//! be tested and reused from the CLI.
//!
//! # Overview
//!
//! - [`routes`] - Server-rendered pages (product list, variant detail) and
//!   the price-update endpoint that feeds the price-change handler
//! - [`services`] - The price-change handler: append-only price history and
//!   the trailing-30-day lowest price
//! - [`db`] - `PostgreSQL` repositories for products, variants, and history

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
