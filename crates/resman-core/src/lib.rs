//! Resource manager core: domain models, repository traits, capacity
//! accounting and the access policy.
//!
//! Nothing in this crate performs I/O. Repository traits are implemented
//! by `resman-db`; everything else is pure and synchronous.

pub mod capacity;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
