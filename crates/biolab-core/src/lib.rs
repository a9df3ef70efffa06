//! Core types and trait definitions for the BioLab inquiry service.
//!
//! Domain model only: no HTTP, no database. The store and API crates both
//! depend on this one, never the other way around.

// Backends implement the store trait with plain `async fn`; the returned
// futures still carry explicit `Send` bounds at the trait.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod inquiry;
pub mod post;
pub mod store;

pub use error::{Error, Result};
