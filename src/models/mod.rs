//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `commit`: CommitRecord, CommitListItem, CommitListResponse, ContributorInfo
//! - `compare`: ResolvedRef, DivergenceReport, ChangedMessage, CompareResponse
//! - `diff`: DiffResponse, FileDiff, DiffHunk, DiffLine
//! - `repository`: RepositoryInfo, BranchInfo

pub mod commit;
pub mod compare;
pub mod diff;
pub mod repository;

pub use commit::*;
pub use compare::*;
pub use diff::*;
pub use repository::*;
