//! Branch comparison core.
//!
//! Pure functions over in-memory data - no git access, no I/O.
//! - `resolver`: pick the concrete ref to query for a short name
//! - `divergence`: three-way set difference between two commit lists
//!
//! All repository reads happen in `crate::git` before or around these.

pub mod divergence;
pub mod resolver;

pub use divergence::{CompareOptions, compute_divergence};
pub use resolver::{RefQueries, resolve_ref};
