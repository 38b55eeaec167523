//! Business logic services.

pub mod price_watch;
