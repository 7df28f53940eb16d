//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the collaborator traits in
//! [`projection::store`].
//!
//! # Modules
//!
//! - `projection` - Projected invoice and payment journals

pub mod projection;
