//! gitscope - a self-contained git history and branch comparison panel.
//!
//! The interesting logic lives in [`compare`]: resolving an ambiguous
//! short ref name to a concrete ref, and computing the divergence
//! between two commit histories. Everything else is plumbing between
//! the browser panel and libgit2.

pub mod compare;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;
