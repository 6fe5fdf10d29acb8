//! Core types for the tariffs service.
//!
//! Pure data and pure functions only: domain models, request validation, and
//! the storage contracts (envelope, key scheme, repository trait, errors)
//! implemented by the `tariffs` crate.

pub mod models;
pub mod storage;
