//! Core types and trait definitions for the Streamfair catalog.
//!
//! Domain types, the content fingerprint and the [`store::CatalogStore`]
//! trait. No HTTP or database code lives here.

pub mod account;
pub mod credit;
pub mod error;
pub mod fingerprint;
pub mod song;
pub mod store;

pub use error::{Error, ErrorKind, Result};
