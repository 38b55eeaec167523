//! Core types for Pricewatch.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod changeset;
pub mod id;
pub mod window;

pub use changeset::{Changeset, FieldChange, PRICE_FIELD};
pub use id::*;
pub use window::trailing_window_start;
